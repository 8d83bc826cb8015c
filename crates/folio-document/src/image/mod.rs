// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decode user images and normalise them to fixed-quality JPEG.

pub mod rasterizer;

pub use rasterizer::{JPEG_QUALITY, RasterResult, Rasterizer};
