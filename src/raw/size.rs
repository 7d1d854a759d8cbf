use super::handle::Handle;

/// Number of nodes in a subtree, the node itself included.
///
/// Bounded by [`Handle::MAX`]: a subtree can never hold more nodes than the
/// arena can address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Size(u32);

impl Size {
    pub(crate) const MAX: usize = Handle::MAX;
    pub(crate) const ONE: Self = Self(1);

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0 as usize
    }

    /// Grows the count by one node on an insertion path.
    #[inline]
    pub(crate) fn increment(&mut self) {
        assert!(self.to_usize() < Self::MAX, "`Size::increment()` - size would exceed `Size::MAX`!");
        self.0 += 1;
    }

    /// Shrinks the count by one node on a deletion path.
    #[inline]
    pub(crate) fn decrement(&mut self) {
        assert!(self.0 > 1, "`Size::decrement()` - a subtree on a deletion path must keep its root!");
        self.0 -= 1;
    }
}

/// Size of an optional child; an empty slot counts as zero.
#[inline]
pub(crate) fn size_or_zero(size: Option<Size>) -> usize {
    size.map_or(0, Size::to_usize)
}
