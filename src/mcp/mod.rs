// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model Context Protocol (MCP) server surface.
//!
//! Publishes the dispatch and documentation operations as tools. Every tool answers with an
//! [`Envelope`]; protocol errors are reserved for malformed parameters.

mod server;
mod types;

pub use server::CadMcp;
pub use types::{
    AccessPropertyParams, DocsExamplesParams, DocsInterfaceParams, DocsMemberParams,
    DocsSearchParams, Envelope, InspectObjectParams, InvokeMemberParams,
};
