// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod manager;
pub mod membership;
pub mod population;
pub mod ranking;

pub use activity::{ActivityRecorder, Completion};
pub use manager::{Manager, OpResult, OperationKind, ReadQuery};
pub use membership::MembershipService;
