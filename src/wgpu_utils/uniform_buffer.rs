// src/wgpu_utils/uniform_buffer.rs
use std::marker::PhantomData;

fn short_type_name<Content>() -> &'static str {
    let type_name = std::any::type_name::<Content>();
    match type_name.rfind(':') {
        Some(pos) => &type_name[(pos + 1)..],
        None => type_name,
    }
}

/// A uniform buffer holding exactly one `Content`
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    previous_content: Vec<u8>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", short_type_name::<Content>())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: Vec::new(),
        }
    }

    /// Writes `content` unless it equals what was written last
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) {
        let new_content = bytemuck::bytes_of(&content);
        if self.previous_content == new_content {
            return;
        }
        queue.write_buffer(&self.buffer, 0, new_content);
        self.previous_content = new_content.to_vec();
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}

/// Rounds `size` up to the next multiple of `alignment`
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

/// Lays `items` out `stride` bytes apart, zero-filling the gaps
pub fn pack_aligned<Content: bytemuck::Pod>(items: &[Content], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; items.len() * stride];
    for (slot, item) in bytes.chunks_exact_mut(stride).zip(items) {
        let raw = bytemuck::bytes_of(item);
        slot[..raw.len()].copy_from_slice(raw);
    }
    bytes
}

/// Uniform buffer of `Content` slots addressed with dynamic offsets.
///
/// Each slot starts on the device's uniform offset alignment. The buffer grows
/// to fit the largest frame seen so far; growing replaces the underlying
/// buffer, which [`DynamicUniformBuffer::write`] reports so bind groups can be
/// rebuilt.
pub struct DynamicUniformBuffer<Content> {
    buffer: wgpu::Buffer,
    stride: u64,
    capacity: usize,
    content_type: PhantomData<Content>,
}

impl<Content: bytemuck::Pod> DynamicUniformBuffer<Content> {
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = aligned_stride(std::mem::size_of::<Content>() as u64, alignment);
        let capacity = capacity.max(1);
        Self {
            buffer: Self::allocate(device, stride, capacity),
            stride,
            capacity,
            content_type: PhantomData,
        }
    }

    fn allocate(device: &wgpu::Device, stride: u64, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("DynamicUniformBuffer: {}", short_type_name::<Content>())),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Uploads one slot per item; returns true if the buffer was reallocated
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, items: &[Content]) -> bool {
        let grown = items.len() > self.capacity;
        if grown {
            self.capacity = items.len().next_power_of_two();
            self.buffer = Self::allocate(device, self.stride, self.capacity);
        }
        if !items.is_empty() {
            queue.write_buffer(&self.buffer, 0, &pack_aligned(items, self.stride));
        }
        grown
    }

    /// Byte offset of slot `index`
    pub fn offset(&self, index: usize) -> wgpu::DynamicOffset {
        (self.stride * index as u64) as wgpu::DynamicOffset
    }

    /// Binding covering a single slot, for use with a dynamic offset
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(std::mem::size_of::<Content>() as u64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_stride_rounds_up() {
        assert_eq!(aligned_stride(160, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(257, 256), 512);
        assert_eq!(aligned_stride(12, 0), 12);
    }

    #[test]
    fn test_pack_aligned_places_items_on_stride() {
        let bytes = pack_aligned(&[[1u32, 2], [3, 4]], 16);
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytemuck::cast_slice::<u8, u32>(&bytes[0..8]), &[1, 2]);
        assert!(bytes[8..16].iter().all(|&b| b == 0));
        assert_eq!(bytemuck::cast_slice::<u8, u32>(&bytes[16..24]), &[3, 4]);
    }
}
