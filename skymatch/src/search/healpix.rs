//! HEALPix-binned candidate index.
//!
//! Candidates are grouped by their nested-scheme pixel at a fixed order, laid
//! out the way a pixel offset table lays out a catalog file: one sorted list of
//! occupied pixels, an offset per pixel, and the member indices grouped
//! contiguously (ascending within each pixel).
//!
//! A nearest-neighbor query starts with a search radius of one pixel width and
//! doubles it until the `nth` best separation found is inside the radius. Every
//! candidate within the radius is guaranteed to be gathered, so the answer is
//! the same one an exhaustive scan gives, tie-break included. When the disc
//! grows past 90°, or sampling it would cost more than visiting every
//! candidate, the query falls back to a scan.

use super::scan::{nth_nearest_in, within_in};
use super::{select_nth, Neighbor, NeighborIndex, TIE_RESOLUTION};
use crate::distance::PreparedPoint;
use crate::error::{MatchError, Result};
use crate::point::PointSet;
use skymatch_core::angle::wrap_0_2pi;
use skymatch_core::constants::{DEG_TO_RAD, FULL_SKY_SQ_DEG, HALF_PI, PI, TWOPI};
use skymatch_core::Angle;
use std::collections::HashSet;

/// Highest order accepted. nside = 8192, about 8·10⁸ pixels.
pub const MAX_ORDER: u32 = 13;

const AUTO_MIN_ORDER: u32 = 1;
const AUTO_MAX_ORDER: u32 = 10;
/// Average occupancy [`order_for_catalog`] aims for on a full-sky catalog.
const TARGET_PER_PIXEL: f64 = 4.0;

/// Past this radius the disc covers a hemisphere and a scan is cheaper.
const FULL_SCAN_RADIUS: f64 = HALF_PI;
/// Disc padding in pixel widths. Covers the largest pixel diameter.
const DISC_PADDING: f64 = 3.0;
/// Sampling grid spacing in pixel widths. Finer than the narrowest pixel.
const SAMPLE_STEP: f64 = 0.2;

/// Picks an order giving a few candidates per pixel for a full-sky catalog.
pub fn order_for_catalog(candidate_count: usize) -> u32 {
    let pixels = (candidate_count as f64 / TARGET_PER_PIXEL / 12.0).max(1.0);
    let order = libm::floor(libm::log2(pixels) / 2.0) as u32;
    order.clamp(AUTO_MIN_ORDER, AUTO_MAX_ORDER)
}

/// Approximate pixel width in radians (square root of the pixel area).
pub fn pixel_size(order: u32) -> f64 {
    let nside = (1u64 << order) as f64;
    libm::sqrt(FULL_SKY_SQ_DEG / (12.0 * nside * nside)) * DEG_TO_RAD
}

/// Nested-scheme pixel index of (`lon`, `lat`) in radians.
///
/// Follows Górski et al. (2005). Returns a value in [0, 12·nside²).
pub fn ang2pix_nest(order: u32, lon: f64, lat: f64) -> u64 {
    let nside = 1u64 << order;
    let z = libm::sin(lat);
    let za = libm::fabs(z);

    let mut tt = wrap_0_2pi(lon) * 2.0 / PI;
    if tt >= 4.0 {
        tt -= 4.0;
    }

    let (face, ix, iy) = if za <= 2.0 / 3.0 {
        equatorial_face(tt, z, nside)
    } else {
        polar_face(tt, z, za, nside)
    };

    (face << (2 * order)) + interleave_bits(ix, iy, order)
}

fn equatorial_face(tt: f64, z: f64, nside: u64) -> (u64, u64, u64) {
    let n = nside as f64;
    let temp1 = n * (0.5 + tt);
    let temp2 = n * z * 0.75;
    // index of the ascending and descending edge lines
    let jp = (temp1 - temp2) as u64;
    let jm = (temp1 + temp2) as u64;
    let ifp = jp / nside;
    let ifm = jm / nside;

    let face = if ifp == ifm {
        ifp | 4
    } else if ifp < ifm {
        ifp
    } else {
        ifm + 8
    };

    let ix = jm & (nside - 1);
    let iy = nside - (jp & (nside - 1)) - 1;
    (face, ix, iy)
}

fn polar_face(tt: f64, z: f64, za: f64, nside: u64) -> (u64, u64, u64) {
    let ntt = (tt as u64).min(3);
    let tp = tt - ntt as f64;
    let tmp = nside as f64 * libm::sqrt(3.0 * (1.0 - za));

    let jp = ((tp * tmp) as u64).min(nside - 1);
    let jm = (((1.0 - tp) * tmp) as u64).min(nside - 1);

    if z > 0.0 {
        (ntt, nside - jm - 1, nside - jp - 1)
    } else {
        (ntt + 8, jp, jm)
    }
}

/// Z-order interleave of (ix, iy) within a base face.
fn interleave_bits(ix: u64, iy: u64, order: u32) -> u64 {
    let mut result: u64 = 0;
    for i in 0..order {
        let bit_x = (ix >> i) & 1;
        let bit_y = (iy >> i) & 1;
        result |= (bit_x << (2 * i)) | (bit_y << (2 * i + 1));
    }
    result
}

/// Candidates binned by HEALPix pixel. See the module docs.
pub struct HealpixIndex {
    order: u32,
    pixel_size: f64,
    candidates: Vec<PreparedPoint>,
    pixels: Vec<u64>,
    offsets: Vec<usize>,
    members: Vec<usize>,
}

impl HealpixIndex {
    /// Bins `candidates` at `order`.
    ///
    /// # Errors
    /// [`MatchError::InvalidParameter`] if `order` exceeds [`MAX_ORDER`].
    pub fn new(candidates: &PointSet, order: u32) -> Result<Self> {
        if order > MAX_ORDER {
            return Err(MatchError::invalid_parameter(format!(
                "HEALPix order {} exceeds maximum {}",
                order, MAX_ORDER
            )));
        }

        let prepared: Vec<PreparedPoint> = candidates.iter().map(PreparedPoint::new).collect();
        let pixel_of: Vec<u64> = prepared
            .iter()
            .map(|p| ang2pix_nest(order, p.lon(), p.lat()))
            .collect();

        // stable sort keeps indices ascending inside each pixel
        let mut members: Vec<usize> = (0..prepared.len()).collect();
        members.sort_by_key(|&i| pixel_of[i]);

        let mut pixels = Vec::new();
        let mut offsets = Vec::new();
        for (pos, &i) in members.iter().enumerate() {
            if pixels.last() != Some(&pixel_of[i]) {
                pixels.push(pixel_of[i]);
                offsets.push(pos);
            }
        }
        offsets.push(members.len());

        log::debug!(
            "HEALPix index: order {}, {} candidates in {} occupied pixels of {}",
            order,
            prepared.len(),
            pixels.len(),
            12u64 << (2 * order)
        );

        Ok(Self {
            order,
            pixel_size: pixel_size(order),
            candidates: prepared,
            pixels,
            offsets,
            members,
        })
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    /// Number of pixels holding at least one candidate.
    pub fn occupied_pixels(&self) -> usize {
        self.pixels.len()
    }

    /// Candidate indices in `pixel`, ascending. Empty if the pixel is unoccupied.
    pub fn members_of(&self, pixel: u64) -> &[usize] {
        match self.pixels.binary_search(&pixel) {
            Ok(slot) => &self.members[self.offsets[slot]..self.offsets[slot + 1]],
            Err(_) => &[],
        }
    }

    /// Sampling `radius` costs more than visiting every candidate.
    fn disc_too_costly(&self, radius: f64) -> bool {
        if radius >= FULL_SCAN_RADIUS {
            return true;
        }
        let reach = (radius + DISC_PADDING * self.pixel_size).min(PI);
        let step = SAMPLE_STEP * self.pixel_size;
        let disc_area = TWOPI * (1.0 - libm::cos(reach));
        disc_area / (step * step) > self.candidates.len() as f64
    }

    /// Every pixel that may hold a point within `radius` of (`lon`, `lat`).
    ///
    /// Samples the padded disc on a grid finer than any pixel, row by row, using
    /// the exact longitude half-width of the disc on each row.
    fn query_disc(&self, lon: f64, lat: f64, radius: f64) -> HashSet<u64> {
        let reach = (radius + DISC_PADDING * self.pixel_size).min(PI);
        let step = SAMPLE_STEP * self.pixel_size;

        let mut pixels = HashSet::new();
        pixels.insert(ang2pix_nest(self.order, lon, lat));

        let lat_min = (lat - reach).max(-HALF_PI);
        let lat_max = (lat + reach).min(HALF_PI);
        let rows = libm::ceil((lat_max - lat_min) / step) as usize;

        let (sin_lat0, cos_lat0) = libm::sincos(lat);
        let cos_reach = libm::cos(reach);

        for row in 0..=rows {
            let row_lat = (lat_min + row as f64 * step).min(lat_max);
            let (sin_row, cos_row) = libm::sincos(row_lat);

            if cos_row < 1e-12 {
                pixels.insert(ang2pix_nest(self.order, 0.0, row_lat));
                continue;
            }

            let half_width = row_half_width(cos_reach, sin_lat0, cos_lat0, sin_row, cos_row);
            let lon_step = step / cos_row;
            let cols = libm::ceil(2.0 * half_width / lon_step) as usize;

            for col in 0..=cols {
                let row_lon = (lon - half_width + col as f64 * lon_step).min(lon + half_width);
                pixels.insert(ang2pix_nest(self.order, row_lon, row_lat));
            }
        }

        pixels
    }

    fn gather(&self, query: &PreparedPoint, radius: Angle) -> Vec<Neighbor> {
        let mut found = Vec::new();
        for pixel in self.query_disc(query.lon(), query.lat(), radius.radians()) {
            for &index in self.members_of(pixel) {
                let separation = query.separation(&self.candidates[index]);
                if separation <= radius {
                    found.push(Neighbor { index, separation });
                }
            }
        }
        found
    }
}

/// Longitude half-width of the disc of angular radius `acos(cos_reach)`
/// centered at latitude φ0, measured along the row at latitude φ.
fn row_half_width(cos_reach: f64, sin_lat0: f64, cos_lat0: f64, sin_row: f64, cos_row: f64) -> f64 {
    let denom = cos_lat0 * cos_row;
    if denom < 1e-12 {
        return PI;
    }
    let c = (cos_reach - sin_lat0 * sin_row) / denom;
    libm::acos(c.clamp(-1.0, 1.0))
}

impl NeighborIndex for HealpixIndex {
    fn len(&self) -> usize {
        self.candidates.len()
    }

    fn nth_nearest(&self, query: &PreparedPoint, nth: usize) -> Option<Neighbor> {
        if nth == 0 || nth > self.candidates.len() {
            return None;
        }

        let mut radius = self.pixel_size;
        loop {
            if self.disc_too_costly(radius) {
                log::trace!(
                    "radius {:.4}° too wide for HEALPix order {}, scanning",
                    radius.to_degrees(),
                    self.order
                );
                return nth_nearest_in(&self.candidates, query, nth);
            }

            let mut found = self.gather(query, Angle::from_radians(radius));
            if found.len() >= nth {
                let best = select_nth(&mut found, nth)?;
                // every candidate in the tie window must also be inside the disc
                if best.separation.radians() + TIE_RESOLUTION <= radius {
                    return Some(best);
                }
            }

            log::trace!(
                "{} of {} neighbors within {:.4}°, widening",
                found.len(),
                nth,
                radius.to_degrees()
            );
            radius *= 2.0;
        }
    }

    fn within(&self, query: &PreparedPoint, radius: Angle) -> Vec<Neighbor> {
        if self.disc_too_costly(radius.radians()) {
            return within_in(&self.candidates, query, radius);
        }
        self.gather(query, radius)
    }
}
