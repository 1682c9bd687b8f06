//! 4-byte aligned byte storage so label buffers can be viewed as `&[u32]`.

/// A byte vector with guaranteed 4-byte alignment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlignedBytes {
    /// Storage as u32 to guarantee alignment; the last word may be partially used.
    storage: Vec<u32>,
    len: usize,
}

impl AlignedBytes {
    pub fn new_zeroed(len: usize) -> Self {
        Self {
            storage: vec![0u32; len.div_ceil(4)],
            len,
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut result = Self::new_zeroed(bytes.len());
        result.as_mut_slice().copy_from_slice(bytes);
        result
    }

    /// Takes ownership of whole words without copying.
    pub fn from_words(words: Vec<u32>) -> Self {
        let len = words.len() * 4;
        Self {
            storage: words,
            len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &bytemuck::cast_slice::<u32, u8>(&self.storage)[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<u32, u8>(&mut self.storage)[..self.len]
    }
}
