//! Pipeline Cache Tests
//!
//! Tests for:
//! - Identical keys resolving to one pipeline
//! - Every structural field splitting entries, shaders included
//! - Strip index format normalization
//! - Canonical layouts collapsing attribute order

use myth_glb::renderer::pipeline::vertex::{BufferLayout, build_vertex_layout, AttributeAccessor};
use myth_glb::resources::accessor::{Accessor, ComponentType, ElementType};
use myth_glb::{PipelineCache, PipelineKey, SceneSettings};

const COLOR: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;
const DEPTH: Option<wgpu::TextureFormat> = Some(wgpu::TextureFormat::Depth32Float);
const VS: u32 = 10;
const FS: u32 = 11;

fn position_layout() -> Vec<BufferLayout> {
    vec![BufferLayout {
        array_stride: 12,
        attributes: vec![wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        }],
    }]
}

fn key(topology: wgpu::PrimitiveTopology, index_format: Option<wgpu::IndexFormat>) -> PipelineKey {
    PipelineKey::new(
        &VS,
        &FS,
        topology,
        index_format,
        position_layout(),
        &[&1u32],
        COLOR,
        DEPTH,
        &SceneSettings::default(),
    )
}

// ============================================================================
// Deduplication
// ============================================================================

#[test]
fn identical_keys_share_one_pipeline() {
    let mut cache: PipelineCache<String> = PipelineCache::new();
    let mut factory_calls = 0;

    let first = cache.get_or_create(&key(wgpu::PrimitiveTopology::TriangleList, None), |_| {
        factory_calls += 1;
        "a".to_string()
    });
    let second = cache.get_or_create(&key(wgpu::PrimitiveTopology::TriangleList, None), |_| {
        factory_calls += 1;
        "b".to_string()
    });

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.id, second.id);
    assert_eq!(factory_calls, 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(second.id), "a");
}

#[test]
fn topology_change_creates_new_pipeline() {
    let mut cache: PipelineCache<u32> = PipelineCache::new();

    let triangles = cache.get_or_create(&key(wgpu::PrimitiveTopology::TriangleList, None), |_| 1);
    let lines = cache.get_or_create(&key(wgpu::PrimitiveTopology::LineList, None), |_| 2);

    assert_ne!(triangles.id, lines.id);
    assert_eq!(cache.len(), 2);
    assert_eq!(*cache.get(lines.id), 2);
}

#[test]
fn target_formats_split_entries() {
    let settings = SceneSettings::default();
    let base = key(wgpu::PrimitiveTopology::TriangleList, None);
    let other_color = PipelineKey::new(
        &VS,
        &FS,
        wgpu::PrimitiveTopology::TriangleList,
        None,
        position_layout(),
        &[&1u32],
        wgpu::TextureFormat::Rgba8Unorm,
        DEPTH,
        &settings,
    );
    let no_depth = PipelineKey::new(
        &VS,
        &FS,
        wgpu::PrimitiveTopology::TriangleList,
        None,
        position_layout(),
        &[&1u32],
        COLOR,
        None,
        &settings,
    );

    assert_ne!(base, other_color);
    assert_ne!(base, no_depth);
}

#[test]
fn pipeline_state_settings_split_entries() {
    let settings = SceneSettings {
        cull_mode: None,
        ..SceneSettings::default()
    };
    let culled = key(wgpu::PrimitiveTopology::TriangleList, None);
    let unculled = PipelineKey::new(
        &VS,
        &FS,
        wgpu::PrimitiveTopology::TriangleList,
        None,
        position_layout(),
        &[&1u32],
        COLOR,
        DEPTH,
        &settings,
    );
    assert_ne!(culled, unculled);
}

#[test]
fn shader_modules_split_entries() {
    let settings = SceneSettings::default();
    let base = key(wgpu::PrimitiveTopology::TriangleList, None);
    let other_vs = PipelineKey::new(
        &20u32,
        &FS,
        wgpu::PrimitiveTopology::TriangleList,
        None,
        position_layout(),
        &[&1u32],
        COLOR,
        DEPTH,
        &settings,
    );
    let swapped = PipelineKey::new(
        &FS,
        &VS,
        wgpu::PrimitiveTopology::TriangleList,
        None,
        position_layout(),
        &[&1u32],
        COLOR,
        DEPTH,
        &settings,
    );

    assert_ne!(base, other_vs);
    assert_ne!(base, swapped);
}

#[test]
fn entry_points_split_entries() {
    let settings = SceneSettings {
        fragment_entry_point: "fs_unlit",
        ..SceneSettings::default()
    };
    let base = key(wgpu::PrimitiveTopology::TriangleList, None);
    let unlit = PipelineKey::new(
        &VS,
        &FS,
        wgpu::PrimitiveTopology::TriangleList,
        None,
        position_layout(),
        &[&1u32],
        COLOR,
        DEPTH,
        &settings,
    );

    assert_eq!(unlit.fragment_entry_point, "fs_unlit");
    assert_ne!(base, unlit);
}

#[test]
fn bind_group_layouts_split_entries() {
    let settings = SceneSettings::default();
    let one = PipelineKey::new(
        &VS,
        &FS,
        wgpu::PrimitiveTopology::TriangleList,
        None,
        position_layout(),
        &[&1u32],
        COLOR,
        DEPTH,
        &settings,
    );
    let two = PipelineKey::new(
        &VS,
        &FS,
        wgpu::PrimitiveTopology::TriangleList,
        None,
        position_layout(),
        &[&1u32, &2u32],
        COLOR,
        DEPTH,
        &settings,
    );
    let swapped = PipelineKey::new(
        &VS,
        &FS,
        wgpu::PrimitiveTopology::TriangleList,
        None,
        position_layout(),
        &[&2u32],
        COLOR,
        DEPTH,
        &settings,
    );

    assert_ne!(one, two);
    assert_ne!(one, swapped);
}

// ============================================================================
// Index format normalization
// ============================================================================

#[test]
fn index_format_is_dropped_for_list_topologies() {
    let u16_list = key(wgpu::PrimitiveTopology::TriangleList, Some(wgpu::IndexFormat::Uint16));
    let u32_list = key(wgpu::PrimitiveTopology::TriangleList, Some(wgpu::IndexFormat::Uint32));
    let plain = key(wgpu::PrimitiveTopology::TriangleList, None);

    assert_eq!(u16_list.strip_index_format, None);
    assert_eq!(u16_list, u32_list);
    assert_eq!(u16_list, plain);
}

#[test]
fn index_format_is_kept_for_strip_topologies() {
    let u16_strip = key(wgpu::PrimitiveTopology::TriangleStrip, Some(wgpu::IndexFormat::Uint16));
    let u32_strip = key(wgpu::PrimitiveTopology::TriangleStrip, Some(wgpu::IndexFormat::Uint32));

    assert_eq!(u16_strip.strip_index_format, Some(wgpu::IndexFormat::Uint16));
    assert_ne!(u16_strip, u32_strip);

    let line_strip = key(wgpu::PrimitiveTopology::LineStrip, Some(wgpu::IndexFormat::Uint32));
    assert_eq!(line_strip.strip_index_format, Some(wgpu::IndexFormat::Uint32));
}

// ============================================================================
// Canonical layouts
// ============================================================================

#[test]
fn attribute_declaration_order_collapses_to_one_pipeline() {
    let accessors: Vec<Accessor> = [0u64, 12]
        .into_iter()
        .map(|byte_offset| Accessor {
            buffer_view: 0,
            component_type: ComponentType::F32,
            element_type: ElementType::Vec3,
            normalized: false,
            count: 3,
            byte_offset,
            element_size: 12,
            stride: 24,
            byte_length: 72,
        })
        .collect();
    let position = AttributeAccessor {
        name: "POSITION".to_string(),
        shader_location: 0,
        accessor: 0,
    };
    let normal = AttributeAccessor {
        name: "NORMAL".to_string(),
        shader_location: 1,
        accessor: 1,
    };

    let a = build_vertex_layout(&[position.clone(), normal.clone()], &accessors).unwrap();
    let b = build_vertex_layout(&[normal, position], &accessors).unwrap();

    let settings = SceneSettings::default();
    let key_a = PipelineKey::new(
        &VS,
        &FS,
        wgpu::PrimitiveTopology::TriangleList,
        None,
        a.layouts,
        &[&1u32],
        COLOR,
        DEPTH,
        &settings,
    );
    let key_b = PipelineKey::new(
        &VS,
        &FS,
        wgpu::PrimitiveTopology::TriangleList,
        None,
        b.layouts,
        &[&1u32],
        COLOR,
        DEPTH,
        &settings,
    );

    let mut cache: PipelineCache<()> = PipelineCache::new();
    let first = cache.get_or_create(&key_a, |_| ());
    let second = cache.get_or_create(&key_b, |_| ());

    assert_eq!(first.id, second.id);
    assert!(!second.created);
    assert_eq!(cache.len(), 1);
}

#[test]
fn new_cache_is_empty() {
    let cache: PipelineCache<u32> = PipelineCache::default();
    assert!(cache.is_empty());
    assert_eq!(cache.len(), 0);
}
