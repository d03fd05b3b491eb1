use crate::error::{CodecError, CodecResult};
use std::cell::Cell;
use std::fmt;

/// Non-owning, copyable view over caller-supplied bytes.
///
/// Every flyweight bound to a message (including its nested composites and
/// groups) holds a copy of the same view, so writes through one are visible
/// through the others without any of them owning the memory. The view is not
/// `Sync`: a bound flyweight belongs to one thread.
#[derive(Clone, Copy, Default)]
pub struct DirectBuffer<'a> {
    cells: &'a [Cell<u8>],
}

impl<'a> DirectBuffer<'a> {
    pub fn wrap(bytes: &'a mut [u8]) -> Self {
        Self {
            cells: Cell::from_mut(bytes).as_slice_of_cells(),
        }
    }

    pub fn from_cells(cells: &'a [Cell<u8>]) -> Self {
        Self { cells }
    }

    /* Unbound view, used before the first reset */
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    fn range(&self, offset: usize, size: usize) -> CodecResult<&'a [Cell<u8>]> {
        let overflow = || CodecError::BufferOverflow {
            offset,
            size,
            capacity: self.cells.len(),
        };

        let end = offset.checked_add(size).ok_or_else(overflow)?;
        self.cells.get(offset..end).ok_or_else(overflow)
    }

    /// Fails unless `size` bytes starting at `offset` lie inside the buffer.
    pub fn check_range(&self, offset: usize, size: usize) -> CodecResult<()> {
        self.range(offset, size).map(|_| ())
    }

    pub fn get_bytes(&self, offset: usize, dst: &mut [u8]) -> CodecResult<()> {
        let cells = self.range(offset, dst.len())?;
        for (byte, cell) in dst.iter_mut().zip(cells) {
            *byte = cell.get();
        }
        Ok(())
    }

    pub fn put_bytes(&self, offset: usize, src: &[u8]) -> CodecResult<()> {
        let cells = self.range(offset, src.len())?;
        for (cell, byte) in cells.iter().zip(src) {
            cell.set(*byte);
        }
        Ok(())
    }

    /// Copy of the viewed bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.cells.iter().map(Cell::get).collect()
    }
}

impl fmt::Debug for DirectBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectBuffer")
            .field("capacity", &self.capacity())
            .finish()
    }
}
