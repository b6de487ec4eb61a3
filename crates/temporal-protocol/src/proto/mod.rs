// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Generated Protobuf messages and gRPC clients for the subset of the
//! Temporal API used by the provider.
//!
//! The `.proto` sources under `proto/temporal/api` keep the upstream package
//! names and field tags so messages stay wire compatible with a real
//! frontend. Fields the provider never reads or writes are left out; prost
//! skips unknown tags on decode.
//!
//! Generated code refers across packages with `super::` paths, so the
//! modules nest the same way the packages do. The short aliases below are
//! what the rest of the workspace imports.

#[allow(clippy::all)]
pub mod temporal {
    pub mod api {
        pub mod common {
            pub mod v1 {
                include!(concat!(env!("OUT_DIR"), "/temporal.api.common.v1.rs"));
            }
        }
        pub mod enums {
            pub mod v1 {
                include!(concat!(env!("OUT_DIR"), "/temporal.api.enums.v1.rs"));
            }
        }
        pub mod namespace {
            pub mod v1 {
                include!(concat!(env!("OUT_DIR"), "/temporal.api.namespace.v1.rs"));
            }
        }
        pub mod replication {
            pub mod v1 {
                include!(concat!(env!("OUT_DIR"), "/temporal.api.replication.v1.rs"));
            }
        }
        pub mod taskqueue {
            pub mod v1 {
                include!(concat!(env!("OUT_DIR"), "/temporal.api.taskqueue.v1.rs"));
            }
        }
        pub mod workflow {
            pub mod v1 {
                include!(concat!(env!("OUT_DIR"), "/temporal.api.workflow.v1.rs"));
            }
        }
        pub mod schedule {
            pub mod v1 {
                include!(concat!(env!("OUT_DIR"), "/temporal.api.schedule.v1.rs"));
            }
        }
        pub mod workflowservice {
            pub mod v1 {
                include!(concat!(env!("OUT_DIR"), "/temporal.api.workflowservice.v1.rs"));
            }
        }
        pub mod operatorservice {
            pub mod v1 {
                include!(concat!(env!("OUT_DIR"), "/temporal.api.operatorservice.v1.rs"));
            }
        }
    }
}

pub use self::temporal::api::common::v1 as common;
pub use self::temporal::api::enums::v1 as enums;
pub use self::temporal::api::namespace::v1 as namespace;
pub use self::temporal::api::operatorservice::v1 as operatorservice;
pub use self::temporal::api::replication::v1 as replication;
pub use self::temporal::api::schedule::v1 as schedule;
pub use self::temporal::api::taskqueue::v1 as taskqueue;
pub use self::temporal::api::workflow::v1 as workflow;
pub use self::temporal::api::workflowservice::v1 as workflowservice;
