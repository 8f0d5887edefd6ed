//! The heap allocator: zero-initialized byte blocks for struct cells, and
//! length-prefixed arrays with element stride. No reclamation of
//! unreachable cells — the core leaks heap objects for the lifetime of the
//! machine, matching `original_source/c0vm.c`'s allocate-and-forget model.

use crate::error::HeapError;

/// A typed, safe handle replacing the source's untyped `void*`. Either
/// null, a byte offset into the string pool, or a (block-id, byte-offset)
/// pair into the heap arena. All address arithmetic stays within a single
/// owning block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ref {
    Null,
    /// A byte offset into the read-only string pool (see `ALDC`).
    Str(u32),
    /// A byte offset within a specific heap object.
    Block { block: u32, offset: u32 },
}

/// The fixed encoded width of a reference field stored inline inside a
/// struct cell (see `AMLOAD`/`AMSTORE`): a discriminant plus two `u32`
/// payload words, little-endian.
const REF_SIZE: usize = 12;

fn encode_ref(r: Ref) -> [u8; REF_SIZE] {
    let (tag, a, b): (u32, u32, u32) = match r {
        Ref::Null => (0, 0, 0),
        Ref::Str(off) => (1, off, 0),
        Ref::Block { block, offset } => (2, block, offset),
    };
    let mut out = [0u8; REF_SIZE];
    out[0..4].copy_from_slice(&tag.to_le_bytes());
    out[4..8].copy_from_slice(&a.to_le_bytes());
    out[8..12].copy_from_slice(&b.to_le_bytes());
    out
}

fn decode_ref(bytes: &[u8]) -> Ref {
    let tag = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
    let a = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
    let b = u32::from_le_bytes(bytes[8..12].try_into().unwrap());
    match tag {
        0 => Ref::Null,
        1 => Ref::Str(a),
        2 => Ref::Block {
            block: a,
            offset: b,
        },
        _ => unreachable!("ref tag is only ever written by encode_ref"),
    }
}

/// A single heap allocation: either a zero-initialized struct cell, or an
/// array object with its length-prefixed element region.
enum HeapObject {
    Cell(Vec<u8>),
    Array { count: i32, elt_size: i32, elems: Vec<u8> },
}

/// The machine's heap arena. Objects are appended and never freed.
#[derive(Default)]
pub struct Heap {
    objects: Vec<HeapObject>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// `alloc_cell(n) -> Ref`: `n == 0` is legal and yields a non-null
    /// reference.
    pub fn alloc_cell(&mut self, n: u8) -> Ref {
        self.objects.push(HeapObject::Cell(vec![0u8; n as usize]));
        Ref::Block {
            block: (self.objects.len() - 1) as u32,
            offset: 0,
        }
    }

    /// `alloc_array(n, stride) -> Ref`, traps on `n < 0`.
    pub fn alloc_array(&mut self, n: i32, stride: i32) -> Result<Ref, HeapError> {
        if n < 0 {
            return Err(HeapError::NegativeArraySize(n));
        }
        let elems = vec![0u8; n as usize * stride.max(0) as usize];
        self.objects.push(HeapObject::Array {
            count: n,
            elt_size: stride,
            elems,
        });
        Ok(Ref::Block {
            block: (self.objects.len() - 1) as u32,
            offset: 0,
        })
    }

    /// Resolves a reference expected to address a live heap block. Null is
    /// a memory trap; a string-pool reference here is a verifier-caught
    /// bug (wrong reference kind), not a trap.
    fn require_block(r: Ref) -> Result<(u32, u32), HeapError> {
        match r {
            Ref::Null => Err(HeapError::NullDereference),
            Ref::Str(_) => panic!("expected a heap reference, found a string-pool reference"),
            Ref::Block { block, offset } => Ok((block, offset)),
        }
    }

    fn array_header(&self, r: Ref) -> Result<(u32, i32, i32), HeapError> {
        let (block, _) = Self::require_block(r)?;
        match &self.objects[block as usize] {
            HeapObject::Array { count, elt_size, .. } => Ok((block, *count, *elt_size)),
            HeapObject::Cell(_) => panic!("expected array object, found struct cell"),
        }
    }

    /// `add_field(r, off) -> Ref`: byte-offset arithmetic within the same
    /// block. Traps on null.
    pub fn add_field(&self, r: Ref, off: u8) -> Result<Ref, HeapError> {
        let (block, offset) = Self::require_block(r)?;
        Ok(Ref::Block {
            block,
            offset: offset + off as u32,
        })
    }

    /// `index(r_array, k) -> Ref`: address of element `k`. Traps on null,
    /// `k < 0`, or `k >= count`.
    pub fn index(&self, r: Ref, k: i32) -> Result<Ref, HeapError> {
        let (block, count, elt_size) = self.array_header(r)?;
        if k < 0 || k >= count {
            return Err(HeapError::IndexOutOfBounds { index: k, count });
        }
        Ok(Ref::Block {
            block,
            offset: k as u32 * elt_size as u32,
        })
    }

    /// `ARRAYLENGTH`: traps on null.
    pub fn array_length(&self, r: Ref) -> Result<i32, HeapError> {
        let (_, count, _) = self.array_header(r)?;
        Ok(count)
    }

    fn bytes(&self, block: u32) -> &[u8] {
        match &self.objects[block as usize] {
            HeapObject::Cell(v) => v,
            HeapObject::Array { elems, .. } => elems,
        }
    }

    fn bytes_mut(&mut self, block: u32) -> &mut Vec<u8> {
        match &mut self.objects[block as usize] {
            HeapObject::Cell(v) => v,
            HeapObject::Array { elems, .. } => elems,
        }
    }

    fn field(bytes: &[u8], offset: u32, len: usize) -> &[u8] {
        let o = offset as usize;
        bytes
            .get(o..o + len)
            .expect("field offset out of range for this object (verifier bug)")
    }

    /// `IMLOAD`: traps on null.
    pub fn load_i32(&self, r: Ref) -> Result<i32, HeapError> {
        let (block, offset) = Self::require_block(r)?;
        let slice = Self::field(self.bytes(block), offset, 4);
        Ok(i32::from_le_bytes(slice.try_into().unwrap()))
    }

    /// `IMSTORE`: traps on null.
    pub fn store_i32(&mut self, r: Ref, value: i32) -> Result<(), HeapError> {
        let (block, offset) = Self::require_block(r)?;
        let o = offset as usize;
        let bytes = self.bytes_mut(block);
        let slice = bytes
            .get_mut(o..o + 4)
            .expect("field offset out of range for this object (verifier bug)");
        slice.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// `CMLOAD`: traps on null. Character fields are one byte wide.
    pub fn load_char(&self, r: Ref) -> Result<i32, HeapError> {
        let (block, offset) = Self::require_block(r)?;
        Ok(Self::field(self.bytes(block), offset, 1)[0] as i32)
    }

    /// `CMSTORE`: traps on null. Only the low 7 bits of `value` are stored.
    pub fn store_char(&mut self, r: Ref, value: i32) -> Result<(), HeapError> {
        let (block, offset) = Self::require_block(r)?;
        let o = offset as usize;
        let bytes = self.bytes_mut(block);
        let slice = bytes
            .get_mut(o..o + 1)
            .expect("field offset out of range for this object (verifier bug)");
        slice[0] = (value & 0x7F) as u8;
        Ok(())
    }

    /// `AMLOAD`: single-reference load through a `Ref`. Traps on null.
    pub fn load_ref(&self, r: Ref) -> Result<Ref, HeapError> {
        let (block, offset) = Self::require_block(r)?;
        let slice = Self::field(self.bytes(block), offset, REF_SIZE);
        Ok(decode_ref(slice))
    }

    /// `AMSTORE`: single-reference store through a `Ref`. Traps on null.
    pub fn store_ref(&mut self, r: Ref, value: Ref) -> Result<(), HeapError> {
        let (block, offset) = Self::require_block(r)?;
        let o = offset as usize;
        let bytes = self.bytes_mut(block);
        let slice = bytes
            .get_mut(o..o + REF_SIZE)
            .expect("field offset out of range for this object (verifier bug)");
        slice.copy_from_slice(&encode_ref(value));
        Ok(())
    }
}
