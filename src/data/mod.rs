//! Data layer: transforms, column maps, rescaling, and file-backed loading.
//!
//! Architecture:
//! ```text
//!  delimited sample file
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   file    │  single pass → training / testing matrices
//!   └──────────┘
//!        │  map / transform applied per cell, baked at load
//!        ▼
//!   ┌──────────┐
//!   │  dataset  │  row accessors, pooled min/max
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   scale   │  normalize / denormalize each column to [0, 1]
//!   └──────────┘
//! ```

pub mod dataset;
pub mod file;
pub mod map;
pub mod matrix;
pub mod scale;
pub mod transform;
