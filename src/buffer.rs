//! Shared sample buffers for zero-copy interop
//!
//! A [`SharedBuffer`] is a natively allocated, fixed-length `f32` array that
//! is visible to both the managed-runtime caller (which reads `data`/`size`
//! directly through FFI) and the DSP operations in this crate (which view it
//! as a slice for the duration of a single call).
//!
//! Ownership is manual and single-owner: exactly one release pairs with one
//! allocation. The DSP side never retains, frees, or reallocates a buffer it
//! is handed; it only borrows the samples per call.

use crate::error::{BridgeError, Result};

/// Caller-visible fixed-length sample buffer.
///
/// The layout matches the C struct the Dart host binds against
/// (`float* data; uint32_t size`), so the host can address the samples
/// without copying. `size` always equals the allocated sample count;
/// a buffer with `size == 0` is a legal empty view.
#[repr(C)]
pub struct SharedBuffer {
    /// Pointer to `size` zero-initialized samples.
    pub data: *mut f32,
    /// Number of samples behind `data`.
    pub size: u32,
}

/// Allocate a zero-initialized buffer of `size` samples.
///
/// Uses fallible reservation so an allocation failure surfaces as
/// [`BridgeError::Allocation`] instead of aborting the host process.
pub fn allocate(size: u32) -> Result<Box<SharedBuffer>> {
    let len = size as usize;

    let mut samples: Vec<f32> = Vec::new();
    samples
        .try_reserve_exact(len)
        .map_err(|_| BridgeError::Allocation(len))?;
    samples.resize(len, 0.0);

    // Hand the sample storage over to the raw handle; `release` reclaims it.
    let mut samples = samples.into_boxed_slice();
    let data = samples.as_mut_ptr();
    std::mem::forget(samples);

    Ok(Box::new(SharedBuffer { data, size }))
}

/// Release a buffer previously produced by [`allocate`].
///
/// Null handles are a no-op. A live handle is freed exactly once: both the
/// sample storage and the header are reclaimed here.
///
/// # Safety
///
/// `handle` must be null or a pointer obtained from [`allocate`] (via
/// `Box::into_raw`) that has not been released before. Releasing the same
/// live handle twice is undefined behavior; callers should null their copy
/// after the call.
pub unsafe fn release(handle: *mut SharedBuffer) {
    if handle.is_null() {
        return;
    }

    let buf = unsafe { Box::from_raw(handle) };
    if !buf.data.is_null() {
        let samples = std::ptr::slice_from_raw_parts_mut(buf.data, buf.size as usize);
        drop(unsafe { Box::from_raw(samples) });
    }
}

/// Borrow the samples of a buffer handle for the duration of one call.
///
/// # Safety
///
/// `handle` must be null or a live pointer from [`allocate`], and the
/// returned slice must not outlive the handle. The caller must ensure no
/// concurrent mutation of the same buffer.
pub unsafe fn as_slice<'a>(handle: *const SharedBuffer) -> Result<&'a [f32]> {
    let buf = unsafe { handle.as_ref() }.ok_or(BridgeError::NullBuffer)?;
    if buf.data.is_null() {
        return Err(BridgeError::NullBuffer);
    }
    Ok(unsafe { std::slice::from_raw_parts(buf.data, buf.size as usize) })
}

/// Mutably borrow the samples of a buffer handle for one call.
///
/// # Safety
///
/// Same contract as [`as_slice`], plus exclusivity: no other reference to
/// the same buffer may exist for the lifetime of the returned slice.
pub unsafe fn as_mut_slice<'a>(handle: *mut SharedBuffer) -> Result<&'a mut [f32]> {
    let buf = unsafe { handle.as_mut() }.ok_or(BridgeError::NullBuffer)?;
    if buf.data.is_null() {
        return Err(BridgeError::NullBuffer);
    }
    Ok(unsafe { std::slice::from_raw_parts_mut(buf.data, buf.size as usize) })
}
