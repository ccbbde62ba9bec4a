//! Conversion of Yellowstone transaction updates into [`TransactionView`]s

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;
use yellowstone_grpc_proto::prelude::{InnerInstruction, SubscribeUpdateTransaction};

use crate::core::error::{IndexerError, IndexerResult};
use crate::core::types::{Instruction, TransactionView};

/// Stack height of top-level instructions
const TOP_LEVEL_HEIGHT: u32 = 1;

fn pubkey_from_bytes(bytes: &[u8]) -> IndexerResult<Pubkey> {
    Pubkey::try_from(bytes)
        .map_err(|_| IndexerError::Conversion(format!("invalid pubkey length {}", bytes.len())))
}

fn resolve(keys: &[Pubkey], program_id_index: u32, accounts: &[u8], data: Vec<u8>) -> IndexerResult<Instruction> {
    let lookup = |index: usize| {
        keys.get(index).copied().ok_or_else(|| {
            IndexerError::Conversion(format!("account index {} out of range ({} keys)", index, keys.len()))
        })
    };

    let program_id = lookup(program_id_index as usize)?;
    let accounts = accounts
        .iter()
        .map(|&index| lookup(index as usize))
        .collect::<IndexerResult<Vec<_>>>()?;

    Ok(Instruction::new(program_id, accounts, data))
}

/// Rebuild the call tree below one top-level instruction.
///
/// The runtime records inner instructions as a flat list in execution
/// order with their stack height. An instruction at height `h + 1` was
/// invoked by the closest preceding instruction at height `h`. Without
/// heights every inner instruction is treated as a direct child.
fn build_inner_tree(keys: &[Pubkey], inner: Vec<InnerInstruction>) -> IndexerResult<Vec<Instruction>> {
    let mut roots = Vec::new();
    let mut stack: Vec<(u32, Instruction)> = Vec::new();

    fn attach(stack: &mut Vec<(u32, Instruction)>, roots: &mut Vec<Instruction>) {
        if let Some((_, node)) = stack.pop() {
            match stack.last_mut() {
                Some((_, parent)) => parent.inner.push(node),
                None => roots.push(node),
            }
        }
    }

    for ix in inner {
        let height = ix.stack_height.unwrap_or(TOP_LEVEL_HEIGHT + 1).max(TOP_LEVEL_HEIGHT + 1);
        let node = resolve(keys, ix.program_id_index, &ix.accounts, ix.data)?;

        while matches!(stack.last(), Some((top, _)) if *top >= height) {
            attach(&mut stack, &mut roots);
        }
        stack.push((height, node));
    }
    while !stack.is_empty() {
        attach(&mut stack, &mut roots);
    }

    Ok(roots)
}

/// Convert one transaction update.
///
/// Returns `Ok(None)` for vote transactions and updates missing the
/// transaction body or status meta.
pub fn transaction_view_from_update(update: SubscribeUpdateTransaction) -> IndexerResult<Option<TransactionView>> {
    let Some(info) = update.transaction else {
        return Ok(None);
    };
    if info.is_vote {
        return Ok(None);
    }
    let (Some(transaction), Some(meta)) = (info.transaction, info.meta) else {
        return Ok(None);
    };
    let Some(message) = transaction.message else {
        return Ok(None);
    };

    let signature = bs58::encode(&info.signature).into_string();

    // Static keys first, then address lookup table keys in runtime order
    let keys = message
        .account_keys
        .iter()
        .chain(meta.loaded_writable_addresses.iter())
        .chain(meta.loaded_readonly_addresses.iter())
        .map(|bytes| pubkey_from_bytes(bytes))
        .collect::<IndexerResult<Vec<_>>>()?;

    let mut inner_by_index: HashMap<u32, Vec<InnerInstruction>> = meta
        .inner_instructions
        .into_iter()
        .map(|group| (group.index, group.instructions))
        .collect();

    let instructions = message
        .instructions
        .into_iter()
        .enumerate()
        .map(|(index, ix)| {
            let inner = inner_by_index.remove(&(index as u32)).unwrap_or_default();
            let top = resolve(&keys, ix.program_id_index, &ix.accounts, ix.data)?;
            Ok(top.with_inner(build_inner_tree(&keys, inner)?))
        })
        .collect::<IndexerResult<Vec<_>>>()?;

    Ok(Some(TransactionView::new(signature, update.slot, instructions)))
}
