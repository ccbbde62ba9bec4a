//! Self-invocation scanner
//!
//! Pump.fun emits its events by invoking itself with the event authority
//! as the only account and the serialized event as call data. The scanner
//! walks a transaction's call tree, classifies pump.fun instructions by
//! account count and decodes the event payload found among their inner
//! instructions.

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use super::accounts::{EVENT_AUTHORITY, PUMP_PROGRAM_ID};
use super::decoder::{decode_creation_event, decode_swap_event};
use crate::core::error::DecodeError;
use crate::core::types::{Instruction, TransactionView};
use crate::models::PumpEvent;

/// Account count of the `buy` and `sell` instructions
pub const SWAP_ACCOUNT_COUNT: usize = 12;

/// Account count of the `create` instruction
pub const CREATE_ACCOUNT_COUNT: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Swap,
    Creation,
}

/// Everything recovered from one transaction
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Decoded events in call tree order, tagged with the signature
    pub events: Vec<PumpEvent>,
    /// Payloads located at a valid call site that failed to decode
    pub failures: Vec<DecodeError>,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.failures.is_empty()
    }
}

/// Locates and decodes self-invocation events for one program
#[derive(Debug, Clone)]
pub struct SelfInvocationScanner {
    program_id: Pubkey,
    event_authority: Pubkey,
}

impl Default for SelfInvocationScanner {
    fn default() -> Self {
        Self::new(PUMP_PROGRAM_ID, EVENT_AUTHORITY)
    }
}

impl SelfInvocationScanner {
    pub fn new(program_id: Pubkey, event_authority: Pubkey) -> Self {
        Self {
            program_id,
            event_authority,
        }
    }

    /// Scan every top-level instruction and, one level down, each of its
    /// inner instructions. A decode failure drops that event only.
    pub fn scan(&self, tx: &TransactionView) -> ScanReport {
        let mut report = ScanReport::default();

        for instruction in &tx.instructions {
            self.scan_candidate(instruction, &tx.signature, &mut report);

            for inner in &instruction.inner {
                self.scan_candidate(inner, &tx.signature, &mut report);
            }
        }

        report
    }

    fn classify(&self, instruction: &Instruction) -> Option<Candidate> {
        if !instruction.belongs_to(&self.program_id) {
            return None;
        }
        match instruction.accounts.len() {
            SWAP_ACCOUNT_COUNT => Some(Candidate::Swap),
            CREATE_ACCOUNT_COUNT => Some(Candidate::Creation),
            _ => None,
        }
    }

    /// Decode the event carried by `candidate`'s own self-invocation call
    /// site, if it has one. Only the first matching call site is used.
    fn scan_candidate(&self, candidate: &Instruction, signature: &str, report: &mut ScanReport) {
        let Some(kind) = self.classify(candidate) else {
            return;
        };

        let Some(call_site) = candidate
            .inner
            .iter()
            .find(|inner| inner.is_sole_account(&self.event_authority))
        else {
            return;
        };

        let decoded = match kind {
            Candidate::Swap => decode_swap_event(&call_site.data)
                .map(|swap| PumpEvent::Swap(swap.with_signature(signature))),
            Candidate::Creation => {
                debug!("Token creation in {}", signature);
                decode_creation_event(&call_site.data)
                    .map(|creation| PumpEvent::Creation(creation.with_signature(signature)))
            }
        };

        match decoded {
            Ok(event) => report.events.push(event),
            Err(e) => report.failures.push(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::decoder::{encode_swap_event, SWAP_EVENT_LEN};

    fn accounts(n: usize) -> Vec<Pubkey> {
        (0..n).map(|_| Pubkey::new_unique()).collect()
    }

    fn swap_payload(mint: Pubkey) -> Vec<u8> {
        let mut bytes = vec![0u8; SWAP_EVENT_LEN];
        bytes[16..48].copy_from_slice(mint.as_ref());
        bytes
    }

    fn emit(data: Vec<u8>) -> Instruction {
        Instruction::new(PUMP_PROGRAM_ID, vec![EVENT_AUTHORITY], data)
    }

    fn pump(account_count: usize, inner: Vec<Instruction>) -> Instruction {
        Instruction::new(PUMP_PROGRAM_ID, accounts(account_count), vec![0x66; 24]).with_inner(inner)
    }

    #[test]
    fn test_swap_candidate_yields_event() {
        let mint = Pubkey::new_unique();
        let tx = TransactionView::new("sig1", 1, vec![pump(12, vec![emit(swap_payload(mint))])]);

        let report = SelfInvocationScanner::default().scan(&tx);
        assert_eq!(report.events.len(), 1);
        assert!(report.failures.is_empty());
        match &report.events[0] {
            PumpEvent::Swap(swap) => {
                assert_eq!(swap.mint, mint);
                assert_eq!(swap.signature, "sig1");
            }
            other => panic!("expected swap, got {:?}", other),
        }
    }

    #[test]
    fn test_other_account_counts_never_yield() {
        let scanner = SelfInvocationScanner::default();
        for count in [0, 1, 11, 13, 15, 16] {
            let tx = TransactionView::new(
                "sig",
                1,
                vec![pump(count, vec![emit(swap_payload(Pubkey::new_unique()))])],
            );
            assert!(scanner.scan(&tx).is_empty(), "account count {}", count);
        }
    }

    #[test]
    fn test_missing_call_site_is_silent() {
        let decoy = Instruction::new(PUMP_PROGRAM_ID, vec![EVENT_AUTHORITY, Pubkey::new_unique()], swap_payload(Pubkey::new_unique()));
        let tx = TransactionView::new("sig", 1, vec![pump(12, vec![decoy])]);

        let report = SelfInvocationScanner::default().scan(&tx);
        assert!(report.is_empty());
    }

    #[test]
    fn test_other_program_is_ignored() {
        let foreign = Instruction::new(Pubkey::new_unique(), accounts(12), vec![])
            .with_inner(vec![emit(swap_payload(Pubkey::new_unique()))]);
        let tx = TransactionView::new("sig", 1, vec![foreign]);

        assert!(SelfInvocationScanner::default().scan(&tx).is_empty());
    }

    #[test]
    fn test_nested_candidate_uses_its_own_call_site() {
        let outer_mint = Pubkey::new_unique();
        let nested_mint = Pubkey::new_unique();

        // Router invoking pump.fun, which emits its event one level deeper
        let nested = pump(12, vec![emit(swap_payload(nested_mint))]);
        let router = Instruction::new(Pubkey::new_unique(), accounts(9), vec![])
            .with_inner(vec![nested]);
        let direct = pump(12, vec![emit(swap_payload(outer_mint))]);

        let tx = TransactionView::new("sig", 1, vec![direct, router]);
        let report = SelfInvocationScanner::default().scan(&tx);

        let mints: Vec<Pubkey> = report
            .events
            .iter()
            .map(|e| match e {
                PumpEvent::Swap(s) => s.mint,
                PumpEvent::Creation(c) => c.mint,
            })
            .collect();
        assert_eq!(mints, vec![outer_mint, nested_mint]);
    }

    #[test]
    fn test_nested_candidate_without_call_site_does_not_reuse_parent() {
        let nested = pump(12, vec![]);
        let parent = pump(12, vec![emit(swap_payload(Pubkey::new_unique())), nested]);
        let tx = TransactionView::new("sig", 1, vec![parent]);

        let report = SelfInvocationScanner::default().scan(&tx);
        assert_eq!(report.events.len(), 1);
    }

    #[test]
    fn test_decode_failure_does_not_stop_scan() {
        let broken = pump(12, vec![emit(vec![1, 2, 3])]);
        let good = pump(12, vec![emit(swap_payload(Pubkey::new_unique()))]);
        let tx = TransactionView::new("sig", 1, vec![broken, good]);

        let report = SelfInvocationScanner::default().scan(&tx);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.events.len(), 1);
    }

    #[test]
    fn test_creation_candidate_with_oversized_string_fails() {
        let mut payload = vec![0u8; 16];
        payload.extend_from_slice(&u32::MAX.to_le_bytes());
        let tx = TransactionView::new("sig", 1, vec![pump(14, vec![emit(payload)])]);

        let report = SelfInvocationScanner::default().scan(&tx);
        assert!(report.events.is_empty());
        assert!(matches!(report.failures[0], DecodeError::MalformedPayload { .. }));
    }

    #[test]
    fn test_swap_payload_round_trips_through_scan() {
        let payload = swap_payload(Pubkey::new_unique());
        let tx = TransactionView::new("sig", 1, vec![pump(12, vec![emit(payload.clone())])]);

        let report = SelfInvocationScanner::default().scan(&tx);
        match &report.events[0] {
            PumpEvent::Swap(swap) => assert_eq!(encode_swap_event(swap), payload),
            other => panic!("expected swap, got {:?}", other),
        }
    }
}
