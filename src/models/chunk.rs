/// A contiguous block of file content as read from disk.
///
/// In split mode a chunk may begin and end in the middle of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: u64,
    pub offset: u64,
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn new(index: u64, offset: u64, data: Vec<u8>) -> Self {
        Self {
            index,
            offset,
            data,
        }
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
