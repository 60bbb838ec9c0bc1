// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use serde_json::Value;

use crate::dispatch::{DispatchError, Dispatcher};

use super::types::*;

#[derive(Clone)]
pub struct CadMcp {
    dispatcher: Arc<Dispatcher>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CadMcp {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher, tool_router: Self::tool_router() }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Dispatches and corpus scans block; keep them off the async workers.
    async fn blocking<R>(
        &self,
        f: impl FnOnce(&Dispatcher) -> R + Send + 'static,
    ) -> Result<R, ErrorData>
    where
        R: Send + 'static,
    {
        let dispatcher = self.dispatcher.clone();
        tokio::task::spawn_blocking(move || f(&dispatcher)).await.map_err(|err| {
            ErrorData::internal_error(format!("dispatch task failed: {err}"), None)
        })
    }

    /// Invoke a method on a live CAD object by name, with arguments given as a name-to-value map.
    /// Failures are reported in the envelope, never as protocol errors.
    #[tool(name = "cad.invoke_member")]
    async fn invoke_member(
        &self,
        params: Parameters<InvokeMemberParams>,
    ) -> Result<Json<Envelope>, ErrorData> {
        let InvokeMemberParams { object, member, arguments, include_documentation } = params.0;
        require_name("object", &object)?;
        require_name("member", &member)?;
        let arguments = arguments.unwrap_or(Value::Null);
        let want_documentation = include_documentation.unwrap_or(false);

        let outcome = self
            .blocking(move |dispatcher| {
                dispatcher.invoke_member(&object, &member, &arguments, want_documentation)
            })
            .await?;
        Ok(Json(outcome.into()))
    }

    /// Read a property of a live CAD object, or write it when `value` is given.
    #[tool(name = "cad.access_property")]
    async fn access_property(
        &self,
        params: Parameters<AccessPropertyParams>,
    ) -> Result<Json<Envelope>, ErrorData> {
        let AccessPropertyParams { object, property, value, include_documentation } = params.0;
        require_name("object", &object)?;
        require_name("property", &property)?;
        let want_documentation = include_documentation.unwrap_or(false);

        let outcome = self
            .blocking(move |dispatcher| {
                dispatcher.access_property(&object, &property, value.as_ref(), want_documentation)
            })
            .await?;
        Ok(Json(outcome.into()))
    }

    /// Report whether the CAD application is connected and which document is active.
    #[tool(name = "cad.status")]
    async fn cad_status(&self) -> Result<Json<Envelope>, ErrorData> {
        let status = self.blocking(|dispatcher| dispatcher.status()).await?;
        Ok(Json(Envelope::ok(to_result(&status)?)))
    }

    /// List the well-known object names (and their aliases) accepted as `object`.
    #[tool(name = "object.list")]
    async fn object_list(&self) -> Result<Json<Envelope>, ErrorData> {
        let objects = self.dispatcher.known_objects();
        Ok(Json(Envelope::ok(serde_json::json!({ "objects": to_result(&objects)? }))))
    }

    /// Enumerate the methods and properties of a live object without invoking any of them.
    #[tool(name = "object.inspect")]
    async fn object_inspect(
        &self,
        params: Parameters<InspectObjectParams>,
    ) -> Result<Json<Envelope>, ErrorData> {
        let object = params.0.object;
        require_name("object", &object)?;

        let description = self.blocking(move |dispatcher| dispatcher.inspect(&object)).await?;
        let envelope = match description {
            Ok(description) => Envelope::ok(to_result(&description)?),
            Err(err) => dispatch_failure(&err),
        };
        Ok(Json(envelope))
    }

    /// Full-text search over the API reference corpus, best match first.
    #[tool(name = "docs.search")]
    async fn docs_search(
        &self,
        params: Parameters<DocsSearchParams>,
    ) -> Result<Json<Envelope>, ErrorData> {
        let DocsSearchParams { query, max_results } = params.0;
        let limit = result_limit(max_results);
        let records =
            self.blocking(move |dispatcher| dispatcher.docs().search(&query, limit)).await?;
        Ok(Json(Envelope::ok(to_result(&records)?)))
    }

    /// Overview page of an interface plus the names of its documented members.
    #[tool(name = "docs.interface")]
    async fn docs_interface(
        &self,
        params: Parameters<DocsInterfaceParams>,
    ) -> Result<Json<Envelope>, ErrorData> {
        let interface = params.0.interface;
        require_name("interface", &interface)?;

        let (record, members, interface) = self
            .blocking(move |dispatcher| {
                let docs = dispatcher.docs();
                (docs.lookup(&interface, None), docs.members(&interface), interface)
            })
            .await?;
        if record.is_none() && members.is_empty() {
            return Ok(Json(Envelope::failed(format!(
                "no documentation for interface '{interface}'"
            ))));
        }
        let result = serde_json::json!({ "interface": to_result(&record)?, "members": members });
        Ok(Json(Envelope::ok(result)))
    }

    /// Reference page of one interface member: description, syntax and remarks.
    #[tool(name = "docs.member")]
    async fn docs_member(
        &self,
        params: Parameters<DocsMemberParams>,
    ) -> Result<Json<Envelope>, ErrorData> {
        let DocsMemberParams { interface, member } = params.0;
        require_name("interface", &interface)?;
        require_name("member", &member)?;

        let label = format!("{interface}.{member}");
        let record = self
            .blocking(move |dispatcher| dispatcher.docs().lookup(&interface, Some(&member)))
            .await?;
        let envelope = match record {
            Some(record) => Envelope::ok(to_result(&record)?),
            None => Envelope::failed(format!("no documentation for {label}")),
        };
        Ok(Json(envelope))
    }

    /// Search the example pages of the corpus; results carry the first code block.
    #[tool(name = "docs.examples")]
    async fn docs_examples(
        &self,
        params: Parameters<DocsExamplesParams>,
    ) -> Result<Json<Envelope>, ErrorData> {
        let DocsExamplesParams { query, max_results } = params.0;
        let limit = result_limit(max_results);
        let examples =
            self.blocking(move |dispatcher| dispatcher.docs().examples(&query, limit)).await?;
        Ok(Json(Envelope::ok(to_result(&examples)?)))
    }
}

#[tool_handler]
impl ServerHandler for CadMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Cadbridge CAD automation server (tools: cad.invoke_member, cad.access_property, cad.status, object.list, object.inspect, docs.search, docs.interface, docs.member, docs.examples)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

include!("server/helpers.rs");
