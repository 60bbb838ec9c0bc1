// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cadbridge: a live CAD application's object graph, callable by name over MCP.
//!
//! [`dispatch`] turns symbolic calls into bound calls on the [`session`] connection, [`docs`]
//! searches the API reference corpus, and [`mcp`] publishes both as tools.

pub mod config;
pub mod demo;
pub mod dispatch;
pub mod docs;
pub mod mcp;
pub mod model;
pub mod session;
