//! Buffer views and their GPU buffers.
//!
//! A [`BufferView`] keeps a CPU copy of its byte range, accumulates usage flags
//! as accessors register against it, and owns at most one GPU buffer. However
//! many accessors share a view, it is uploaded exactly once per load.

use crate::assets::document::BufferViewDef;
use crate::assets::glb::align4;
use crate::errors::{ResourceError, Result};
use crate::renderer::backend::RenderBackend;

/// Byte range of a buffer view inside the binary payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub offset: u64,
    pub length: u64,
}

#[derive(Debug)]
pub struct BufferView<T> {
    pub index: usize,
    pub range: ByteRange,
    usage: wgpu::BufferUsages,
    data: Vec<u8>,
    gpu: Option<T>,
}

impl<T> BufferView<T> {
    #[inline]
    #[must_use]
    pub fn usage(&self) -> wgpu::BufferUsages {
        self.usage
    }

    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the GPU allocation: the view length rounded up to 4 bytes.
    #[inline]
    #[must_use]
    pub fn upload_size(&self) -> u64 {
        align4(self.range.length as usize) as u64
    }

    #[inline]
    #[must_use]
    pub fn gpu_buffer(&self) -> Option<&T> {
        self.gpu.as_ref()
    }

    /// Allocates a GPU buffer and copies the view bytes into it.
    ///
    /// A previously uploaded buffer is destroyed first. Not reentrant: callers
    /// must serialize uploads of the same view.
    pub fn upload<B>(&mut self, backend: &B) -> &T
    where
        B: RenderBackend<Buffer = T>,
    {
        if let Some(previous) = self.gpu.take() {
            log::debug!("Re-uploading buffer view {}; destroying previous buffer", self.index);
            backend.destroy_buffer(&previous);
        }

        let mut contents = self.data.clone();
        contents.resize(self.upload_size() as usize, 0);

        log::trace!(
            "Uploading buffer view {}: payload {}..{}",
            self.index,
            self.range.offset,
            self.range.offset + self.range.length
        );
        let label = format!("BufferView {}", self.index);
        self.gpu.insert(backend.create_buffer_init(&label, &contents, self.usage))
    }
}

/// Owns every buffer view of a document.
#[derive(Debug)]
pub struct BufferViewManager<T> {
    views: Vec<BufferView<T>>,
}

impl<T> BufferViewManager<T> {
    /// Copies each view's range out of the binary payload.
    ///
    /// Only buffer 0 (the embedded binary chunk) is addressable.
    pub fn new(defs: &[BufferViewDef], payload: &[u8]) -> Result<Self> {
        let views = defs
            .iter()
            .enumerate()
            .map(|(index, def)| {
                if def.buffer != 0 {
                    return Err(ResourceError::ExternalBuffer {
                        view: index,
                        buffer: def.buffer,
                    }
                    .into());
                }

                let offset = def.byte_offset as usize;
                let end = offset.saturating_add(def.byte_length as usize);
                let data = payload
                    .get(offset..end)
                    .ok_or(ResourceError::ViewOutOfRange {
                        view: index,
                        offset,
                        end,
                        payload: payload.len(),
                    })?
                    .to_vec();

                Ok(BufferView {
                    index,
                    range: ByteRange {
                        offset: def.byte_offset,
                        length: def.byte_length,
                    },
                    usage: wgpu::BufferUsages::empty(),
                    data,
                    gpu: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { views })
    }

    /// Adds `usage` to the flags the view will be created with.
    pub fn register_usage(&mut self, view: usize, usage: wgpu::BufferUsages) -> Result<()> {
        let view = self
            .views
            .get_mut(view)
            .ok_or(ResourceError::IndexOutOfBounds {
                context: "bufferViews",
                index: view,
            })?;
        view.usage |= usage;
        Ok(())
    }

    /// Size of a binding that starts `offset` bytes into `view` and asks for
    /// `requested` bytes, capped at the end of the view.
    ///
    /// The last element of an interleaved view is allowed to stop short of a
    /// full stride, so `count * stride` can overshoot the view.
    pub fn bound_size(&self, view: usize, offset: u64, requested: u64) -> Result<u64> {
        let entry = self.views.get(view).ok_or(ResourceError::IndexOutOfBounds {
            context: "bufferViews",
            index: view,
        })?;

        let size = requested.min(entry.range.length.saturating_sub(offset));
        if size == 0 {
            return Err(ResourceError::EmptyBinding { view, offset }.into());
        }
        Ok(size)
    }

    /// Uploads every view that at least one consumer registered against.
    pub fn upload_all<B>(&mut self, backend: &B) -> usize
    where
        B: RenderBackend<Buffer = T>,
    {
        let mut uploaded = 0;
        for view in &mut self.views {
            if view.usage.is_empty() {
                continue;
            }
            view.usage |= wgpu::BufferUsages::COPY_DST;
            view.upload(backend);
            uploaded += 1;
        }
        uploaded
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&BufferView<T>> {
        self.views.get(index)
    }

    #[inline]
    #[must_use]
    pub fn gpu_buffer(&self, index: usize) -> Option<&T> {
        self.views.get(index).and_then(BufferView::gpu_buffer)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
