//! File-block allocation
//!
//! All three policies place files identically: each file takes the next run
//! of blocks starting at the lowest offset not yet handed out. A file that
//! does not fit in the remaining tail stays unallocated and the cursor does
//! not move, so a later, smaller file may still fit. There is no gap search
//! and no defragmentation.
//!
//! The policies differ only in the bookkeeping they record:
//! - Contiguous: start block and length
//! - Linked: additionally a `next` pointer on every owned block
//! - Indexed: additionally the explicit ordered list of owned blocks

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// File allocation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilePolicy {
    Contiguous,
    Linked,
    Indexed,
}

impl FilePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilePolicy::Contiguous => "contiguous",
            FilePolicy::Linked => "linked",
            FilePolicy::Indexed => "indexed",
        }
    }
}

impl fmt::Display for FilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilePolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "contiguous" => Ok(FilePolicy::Contiguous),
            "linked" => Ok(FilePolicy::Linked),
            "indexed" => Ok(FilePolicy::Indexed),
            _ => Err(EngineError::UnknownPolicy(s.to_string())),
        }
    }
}

/// One disk block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskBlock {
    pub id: usize,
    /// Owning file, `None` when free
    pub file_id: Option<usize>,
    /// Next block of the same file (linked policy only)
    pub next: Option<usize>,
}

/// Per-file allocation metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Position of the file in the request list
    pub id: usize,
    /// Size in blocks
    pub size: usize,
    pub allocated: bool,
    pub start_block: Option<usize>,
    pub block_count: usize,
    /// Ordered owned blocks (indexed policy only)
    pub index_blocks: Vec<usize>,
}

/// Block table and file table after allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTable {
    pub policy: FilePolicy,
    pub blocks: Vec<DiskBlock>,
    pub files: Vec<FileInfo>,
}

impl FileTable {
    pub fn free_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.file_id.is_none()).count()
    }

    /// Ordered blocks owned by file `id`, resolved the way the policy records them
    ///
    /// Returns `None` for an unknown or unallocated file.
    pub fn file_blocks(&self, id: usize) -> Option<Vec<usize>> {
        let file = self.files.get(id).filter(|f| f.allocated)?;
        let blocks = match self.policy {
            FilePolicy::Contiguous => match file.start_block {
                Some(start) => (start..start + file.block_count).collect(),
                None => Vec::new(),
            },
            FilePolicy::Linked => {
                let mut chain = Vec::with_capacity(file.block_count);
                let mut cursor = file.start_block;
                while let Some(block) = cursor {
                    chain.push(block);
                    cursor = self.blocks.get(block).and_then(|b| b.next);
                }
                chain
            }
            FilePolicy::Indexed => file.index_blocks.clone(),
        };
        Some(blocks)
    }
}

/// Place files of the given sizes (in blocks) on a disk of `total_blocks` blocks
///
/// File ids are positions in `file_sizes`. A zero-size file is allocated with
/// no blocks and no start block.
///
/// # Examples
///
/// ```
/// use osalgo_rs::{allocate_files, FilePolicy};
///
/// let table = allocate_files(10, &[4, 8, 3], FilePolicy::Linked);
/// assert!(table.files[0].allocated);
/// assert!(!table.files[1].allocated);
/// assert_eq!(table.file_blocks(2), Some(vec![4, 5, 6]));
/// ```
pub fn allocate_files(total_blocks: usize, file_sizes: &[usize], policy: FilePolicy) -> FileTable {
    debug!(
        "Allocating {} files on {} blocks with {}",
        file_sizes.len(),
        total_blocks,
        policy
    );

    let mut blocks: Vec<DiskBlock> = (0..total_blocks)
        .map(|id| DiskBlock {
            id,
            file_id: None,
            next: None,
        })
        .collect();
    let mut files = Vec::with_capacity(file_sizes.len());
    let mut cursor = 0usize;

    for (id, &size) in file_sizes.iter().enumerate() {
        let mut info = FileInfo {
            id,
            size,
            allocated: false,
            start_block: None,
            block_count: 0,
            index_blocks: Vec::new(),
        };

        // cursor <= total_blocks: it only advances past runs that fit
        if size > total_blocks - cursor {
            debug!(
                "File {} ({} blocks) does not fit in the {} remaining blocks",
                id,
                size,
                total_blocks - cursor
            );
            files.push(info);
            continue;
        }

        let run = cursor..cursor + size;
        for block in run.clone() {
            blocks[block].file_id = Some(id);
            if policy == FilePolicy::Linked && block + 1 < run.end {
                blocks[block].next = Some(block + 1);
            }
        }

        info.allocated = true;
        info.block_count = size;
        if size > 0 {
            info.start_block = Some(cursor);
        }
        if policy == FilePolicy::Indexed {
            info.index_blocks = run.collect();
        }
        trace!("File {} -> blocks {}..{}", id, cursor, cursor + size);

        cursor += size;
        files.push(info);
    }

    FileTable {
        policy,
        blocks,
        files,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_placement() {
        let table = allocate_files(16, &[3, 5, 2], FilePolicy::Contiguous);
        let starts: Vec<Option<usize>> = table.files.iter().map(|f| f.start_block).collect();
        assert_eq!(starts, vec![Some(0), Some(3), Some(8)]);
        assert_eq!(table.free_blocks(), 6);
        assert!(table.blocks.iter().all(|b| b.next.is_none()));
        assert!(table.files.iter().all(|f| f.index_blocks.is_empty()));
        assert_eq!(table.file_blocks(1), Some(vec![3, 4, 5, 6, 7]));
    }

    #[test]
    fn test_oversized_file_skipped_without_moving_cursor() {
        let table = allocate_files(10, &[4, 7, 6], FilePolicy::Contiguous);
        assert!(table.files[0].allocated);
        assert!(!table.files[1].allocated);
        assert_eq!(table.files[1].start_block, None);
        assert!(table.files[2].allocated);
        assert_eq!(table.files[2].start_block, Some(4));
        assert_eq!(table.free_blocks(), 0);
        assert_eq!(table.file_blocks(1), None);
    }

    #[test]
    fn test_linked_next_pointers() {
        let table = allocate_files(8, &[3, 2], FilePolicy::Linked);
        let nexts: Vec<Option<usize>> = table.blocks.iter().map(|b| b.next).collect();
        assert_eq!(
            nexts,
            vec![Some(1), Some(2), None, Some(4), None, None, None, None]
        );
        assert_eq!(table.file_blocks(0), Some(vec![0, 1, 2]));
        assert_eq!(table.file_blocks(1), Some(vec![3, 4]));
    }

    #[test]
    fn test_indexed_block_lists() {
        let table = allocate_files(8, &[2, 3], FilePolicy::Indexed);
        assert_eq!(table.files[0].index_blocks, vec![0, 1]);
        assert_eq!(table.files[1].index_blocks, vec![2, 3, 4]);
        assert_eq!(table.blocks[3].file_id, Some(1));
        assert_eq!(table.blocks[5].file_id, None);
    }

    #[test]
    fn test_same_placement_across_policies() {
        let sizes = [2, 9, 4, 1];
        let owners = |p| {
            allocate_files(12, &sizes, p)
                .blocks
                .into_iter()
                .map(|b| b.file_id)
                .collect::<Vec<_>>()
        };
        let contiguous = owners(FilePolicy::Contiguous);
        assert_eq!(contiguous, owners(FilePolicy::Linked));
        assert_eq!(contiguous, owners(FilePolicy::Indexed));
    }

    #[test]
    fn test_zero_size_and_empty_disk() {
        let table = allocate_files(4, &[0, 2], FilePolicy::Linked);
        assert!(table.files[0].allocated);
        assert_eq!(table.files[0].start_block, None);
        assert_eq!(table.file_blocks(0), Some(Vec::new()));
        assert_eq!(table.files[1].start_block, Some(0));

        let table = allocate_files(0, &[1], FilePolicy::Indexed);
        assert!(table.blocks.is_empty());
        assert!(!table.files[0].allocated);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("Linked".parse::<FilePolicy>().unwrap(), FilePolicy::Linked);
        assert!("fat".parse::<FilePolicy>().is_err());
    }
}
