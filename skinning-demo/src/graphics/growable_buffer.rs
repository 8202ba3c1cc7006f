//! Auto-growing GPU buffer whose contents are replaced wholesale

use std::borrow::Cow;

/// Growth factor when buffer needs to expand (2x)
const BUFFER_GROWTH_FACTOR: u64 = 2;

/// Capacity after growing `current` until it holds `required` bytes.
pub fn grown_capacity(current: u64, required: u64) -> u64 {
    let mut capacity = current.max(wgpu::COPY_BUFFER_ALIGNMENT);
    while capacity < required {
        capacity *= BUFFER_GROWTH_FACTOR;
    }
    capacity
}

/// Zero-pad `data` to a multiple of `wgpu::COPY_BUFFER_ALIGNMENT`.
///
/// Odd `u16` index counts are the usual case.
pub fn pad_to_copy_alignment(data: &[u8]) -> Cow<'_, [u8]> {
    let align = wgpu::COPY_BUFFER_ALIGNMENT as usize;
    if data.len().is_multiple_of(align) {
        Cow::Borrowed(data)
    } else {
        let padded_len = data.len().next_multiple_of(align);
        let mut padded = data.to_vec();
        padded.resize(padded_len, 0);
        Cow::Owned(padded)
    }
}

/// GPU buffer that doubles its capacity when a write does not fit.
///
/// Every [`GrowableBuffer::replace`] overwrites the whole content; nothing is
/// appended. The wgpu buffer is released when this value is dropped.
pub struct GrowableBuffer {
    buffer: wgpu::Buffer,
    usage: wgpu::BufferUsages,
    capacity: u64,
    /// Bytes of meaningful data, before alignment padding
    len: u64,
    label: String,
}

impl GrowableBuffer {
    pub fn new(
        device: &wgpu::Device,
        usage: wgpu::BufferUsages,
        label: &str,
        initial_capacity: u64,
    ) -> Self {
        let capacity = grown_capacity(initial_capacity, 0);
        let buffer = Self::create(device, usage, label, capacity);
        Self {
            buffer,
            usage,
            capacity,
            len: 0,
            label: label.to_string(),
        }
    }

    fn create(
        device: &wgpu::Device,
        usage: wgpu::BufferUsages,
        label: &str,
        size: u64,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Make room for `required` bytes. Reallocation drops the old contents.
    fn ensure_capacity(&mut self, device: &wgpu::Device, required: u64) {
        if required <= self.capacity {
            return;
        }

        let new_capacity = grown_capacity(self.capacity, required);
        tracing::debug!(
            "Growing buffer '{}': {} -> {} bytes",
            self.label,
            self.capacity,
            new_capacity
        );

        self.buffer = Self::create(device, self.usage, &self.label, new_capacity);
        self.capacity = new_capacity;
        self.len = 0;
    }

    /// Replace the buffer contents with `data`, growing first if needed.
    pub fn replace(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[u8]) {
        let padded = pad_to_copy_alignment(data);
        self.ensure_capacity(device, padded.len() as u64);
        if !padded.is_empty() {
            queue.write_buffer(&self.buffer, 0, &padded);
        }
        self.len = data.len() as u64;
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Bytes written by the last [`GrowableBuffer::replace`].
    pub fn len(&self) -> u64 {
        self.len
    }
}
