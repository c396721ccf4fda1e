//! Pipeline stages for image-to-PDF conversion.
//!
//! Each submodule implements exactly one step and can be tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! locate ──▶ order ──▶ codec ──▶ normalize ──▶ pdf
//! (paths)    (1-based)  (decode)  (RGB, cap)   (lopdf)
//! ```
//!
//! 1. [`format`]    — the fixed set of accepted extensions
//! 2. [`locate`]    — files and directories → sorted, deduplicated [`locate::ImageSet`]
//! 3. [`order`]     — parse, validate and apply a user permutation
//! 4. [`codec`]     — decode one file; HEIF behind the `heif` feature
//! 5. [`normalize`] — RGB8 conversion and Lanczos downscale
//! 6. [`pdf`]       — one page per raster, written in a single pass

pub mod codec;
pub mod format;
pub mod locate;
pub mod normalize;
pub mod order;
pub mod pdf;
