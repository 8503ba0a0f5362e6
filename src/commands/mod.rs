// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod records;
pub mod tally;
pub mod balances;
pub mod checklist;
pub mod importer;
pub mod exporter;
pub mod data;
pub mod settings;
pub mod summary;
pub mod doctor;
