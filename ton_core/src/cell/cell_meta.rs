use crate::cell::ton_cell::TonCell;
use crate::cell::ton_hash::TonHash;
use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use std::collections::VecDeque;

/// Lazily computed representation hash & depth of an ordinary cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellMeta {
    pub(crate) hash_depth: OnceCell<(TonHash, u16)>,
}

impl CellMeta {
    pub(crate) fn hash(&self, cell: &TonCell) -> &TonHash { &self.get_hash_depth(cell).0 }

    pub(crate) fn depth(&self, cell: &TonCell) -> u16 { self.get_hash_depth(cell).1 }

    fn get_hash_depth(&self, cell: &TonCell) -> &(TonHash, u16) {
        self.hash_depth.get_or_init(|| {
            // warm up children iteratively, snake chains may be deep
            let mut queue = VecDeque::with_capacity(cell.refs().len());
            for cell_ref in cell.refs().iter().filter(|x| !x.meta.hash_initialized()) {
                queue.push_back((cell_ref, 0));
            }
            while let Some((cur_cell, cur_ref_pos)) = queue.pop_front() {
                if let Some(child) = cur_cell.refs().get(cur_ref_pos) {
                    queue.push_front((cur_cell, cur_ref_pos + 1));
                    if !child.meta.hash_initialized() {
                        queue.push_front((child, 0));
                    }
                } else {
                    let _ = cur_cell.hash();
                }
            }
            calc_hash_depth(cell)
        })
    }

    fn hash_initialized(&self) -> bool { self.hash_depth.get().is_some() }
}

// https://docs.ton.org/v3/documentation/data-formats/tlb/cell-boc#cell-hash
fn calc_hash_depth(cell: &TonCell) -> (TonHash, u16) {
    let refs = cell.refs();
    let depth = refs.iter().map(|x| x.depth() + 1).max().unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(cell.descriptors());
    hasher.update(cell.data_with_completion_tag());
    for cell_ref in refs {
        hasher.update(cell_ref.depth().to_be_bytes());
    }
    for cell_ref in refs {
        hasher.update(cell_ref.hash().as_slice());
    }
    let hash: [u8; 32] = hasher.finalize().into();
    (TonHash::from(hash), depth)
}
