//! Core domain types

use solana_sdk::pubkey::Pubkey;

/// A single instruction in a transaction's call tree.
///
/// `inner` holds the instructions invoked from this one. Top-level
/// instructions carry the inner instructions the runtime recorded for them;
/// when the source reports stack heights those are rebuilt into a proper
/// tree, so a program invoked through another program carries its own
/// callees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<Pubkey>,
    pub data: Vec<u8>,
    pub inner: Vec<Instruction>,
}

impl Instruction {
    pub fn new(program_id: Pubkey, accounts: Vec<Pubkey>, data: Vec<u8>) -> Self {
        Self {
            program_id,
            accounts,
            data,
            inner: Vec::new(),
        }
    }

    pub fn with_inner(mut self, inner: Vec<Instruction>) -> Self {
        self.inner = inner;
        self
    }

    pub fn belongs_to(&self, program_id: &Pubkey) -> bool {
        self.program_id == *program_id
    }

    /// True when the sole account of this instruction is `authority`.
    pub fn is_sole_account(&self, authority: &Pubkey) -> bool {
        matches!(self.accounts.as_slice(), [only] if only == authority)
    }
}

/// Structured view of one transaction notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionView {
    /// Base58 transaction signature
    pub signature: String,
    pub slot: u64,
    pub instructions: Vec<Instruction>,
}

impl TransactionView {
    pub fn new(signature: impl Into<String>, slot: u64, instructions: Vec<Instruction>) -> Self {
        Self {
            signature: signature.into(),
            slot,
            instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sole_account_requires_exactly_one() {
        let authority = Pubkey::new_unique();
        let program = Pubkey::new_unique();

        let single = Instruction::new(program, vec![authority], vec![]);
        let pair = Instruction::new(program, vec![authority, authority], vec![]);
        let other = Instruction::new(program, vec![Pubkey::new_unique()], vec![]);
        let empty = Instruction::new(program, vec![], vec![]);

        assert!(single.is_sole_account(&authority));
        assert!(!pair.is_sole_account(&authority));
        assert!(!other.is_sole_account(&authority));
        assert!(!empty.is_sole_account(&authority));
    }
}
