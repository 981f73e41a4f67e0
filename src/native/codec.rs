//! # Codec Invocation
//!
//! The six codec operations, callable regardless of load state.
//!
//! Every operation starts with a readiness check against the published entry
//! table and short-circuits to a neutral result (`0`, `false`, no-op) when no
//! image is loaded, so capture pipelines can call through unconditionally.
//!
//! ## Buffer Contract
//! All scratch buffers are caller-owned and must be sized up front with
//! [`NativeCodec::state_size`] / [`NativeCodec::shared_size`]. Beyond the
//! slice lengths forwarded to the foreign routines, no bounds checking
//! happens on the native side — an under-sized buffer is undefined behavior
//! there. Callers sharing state/shared buffers across threads must serialize
//! the calls; disjoint buffers may be used concurrently.

use crate::native::loader::NativeCodec;

impl NativeCodec {
    /// Bytes needed for one per-session codec state buffer, `0` when not ready
    pub fn state_size(&self) -> usize {
        match self.entries() {
            Some(entries) => unsafe { (entries.state_size)() }.max(0) as usize,
            None => 0,
        }
    }

    /// Bytes needed for a shared-dictionary buffer at `window_bits`,
    /// `0` when not ready
    pub fn shared_size(&self, window_bits: i32) -> usize {
        match self.entries() {
            Some(entries) => unsafe { (entries.shared_size)(window_bits) }.max(0) as usize,
            None => 0,
        }
    }

    /// Initialize `shared` as a sliding-window dictionary over `window`.
    /// No-op when not ready.
    pub fn set_window(&self, shared: &mut [u8], window_bits: i32, window: &[u8]) {
        if let Some(entries) = self.entries() {
            unsafe {
                (entries.set_window)(
                    shared.as_mut_ptr(),
                    window_bits,
                    window.as_ptr(),
                    window.len() as i32,
                );
            }
        }
    }

    /// Train `state` against sample packets. No-op when not ready.
    ///
    /// An empty `packets` slice primes the state with no samples, which the
    /// foreign routine accepts.
    pub fn train(&self, state: &mut [u8], shared: &mut [u8], packets: &[&[u8]]) {
        let entries = match self.entries() {
            Some(entries) => entries,
            None => return,
        };

        let ptrs: Vec<*const u8> = packets.iter().map(|p| p.as_ptr()).collect();
        let lens: Vec<i32> = packets.iter().map(|p| p.len() as i32).collect();

        unsafe {
            (entries.train)(
                state.as_mut_ptr(),
                shared.as_mut_ptr(),
                ptrs.as_ptr(),
                lens.as_ptr(),
                packets.len() as i32,
            );
        }
    }

    /// Compress `raw` into `compressed`. `compressed` must hold at least
    /// `raw.len()` bytes. Returns `false` when not ready or the foreign
    /// encoder reports failure.
    pub fn encode(
        &self,
        state: &mut [u8],
        shared: &mut [u8],
        raw: &[u8],
        compressed: &mut [u8],
    ) -> bool {
        match self.entries() {
            Some(entries) => unsafe {
                (entries.encode)(
                    state.as_mut_ptr(),
                    shared.as_mut_ptr(),
                    raw.as_ptr(),
                    raw.len() as i32,
                    compressed.as_mut_ptr(),
                ) != 0
            },
            None => false,
        }
    }

    /// Restore `compressed` into `raw`, which must be exactly the original
    /// payload length. Returns `false` when not ready or the foreign decoder
    /// reports failure.
    pub fn decode(
        &self,
        state: &mut [u8],
        shared: &mut [u8],
        compressed: &[u8],
        raw: &mut [u8],
    ) -> bool {
        match self.entries() {
            Some(entries) => unsafe {
                (entries.decode)(
                    state.as_mut_ptr(),
                    shared.as_mut_ptr(),
                    compressed.as_ptr(),
                    compressed.len() as i32,
                    raw.as_mut_ptr(),
                    raw.len() as i32,
                ) != 0
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_operations_degrade_before_load() {
        let codec = NativeCodec::new();
        assert!(!codec.is_ready());

        assert_eq!(codec.state_size(), 0);
        for bits in [0, 1, 17, 24] {
            assert_eq!(codec.shared_size(bits), 0);
        }

        let mut state = vec![0u8; 8];
        let mut shared = vec![0u8; 8];
        let mut out = vec![0u8; 64];

        codec.set_window(&mut shared, 17, &[1, 2, 3]);
        codec.train(&mut state, &mut shared, &[&[1, 2], &[3]]);
        assert!(!codec.encode(&mut state, &mut shared, &[1, 2, 3], &mut out));
        assert!(!codec.decode(&mut state, &mut shared, &[1, 2, 3], &mut out));

        // still untouched: nothing native ran
        assert!(shared.iter().all(|&b| b == 0));
    }
}
