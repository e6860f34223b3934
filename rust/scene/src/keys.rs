// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena keys.
//!
//! Surfaces and catalogue appearances live in `slotmap::SlotMap`s; derived
//! per-surface state in the engine is stored in `SecondaryMap`s keyed by
//! [`SurfaceKey`].

use slotmap::new_key_type;

new_key_type! {
    /// Key for a model surface.
    pub struct SurfaceKey;

    /// Key for an appearance in the catalogue.
    pub struct AppearanceId;
}
