// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
use std::io::Result;

fn main() -> Result<()> {
    // Namespace and schedule RPCs (frontend WorkflowService)
    // plus namespace deletion and search attributes (OperatorService).
    // Only clients are generated; the provider never serves these APIs.
    tonic_build::configure().build_server(false).compile_protos(
        &[
            "proto/temporal/api/workflowservice/v1/service.proto",
            "proto/temporal/api/operatorservice/v1/service.proto",
        ],
        &["proto/"],
    )?;

    Ok(())
}
