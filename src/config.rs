// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command-line and environment configuration.

use std::path::PathBuf;

pub const DEFAULT_MCP_HTTP_PORT: u16 = 27436;

/// Fallback documentation root when neither `--docs` nor a positional directory is given.
pub const DOCS_ENV_VAR: &str = "CADBRIDGE_DOCS";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("`{0}` given more than once")]
    Duplicate(&'static str),
    #[error("`{0}` needs a value")]
    MissingValue(&'static str),
    #[error("invalid port `{0}`")]
    InvalidPort(String),
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("`--mcp` (stdio) cannot be combined with `--mcp-http-port`")]
    StdioWithHttpPort,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Serve MCP over stdio instead of streamable HTTP.
    pub mcp_stdio: bool,
    /// Connect the built-in demo application at startup.
    pub demo: bool,
    pub docs_root: Option<PathBuf>,
    pub mcp_http_port: Option<u16>,
}

impl Config {
    /// Reads the process arguments (without the program name) and environment.
    pub fn from_env(args: impl Iterator<Item = String>) -> Result<Self, ConfigError> {
        Self::parse(args, std::env::var_os(DOCS_ENV_VAR).map(PathBuf::from))
    }

    /// `env_docs_root` only applies when the command line names no documentation root.
    pub fn parse(
        mut args: impl Iterator<Item = String>,
        env_docs_root: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--mcp" => {
                    if config.mcp_stdio {
                        return Err(ConfigError::Duplicate("--mcp"));
                    }
                    config.mcp_stdio = true;
                }
                "--demo" => {
                    if config.demo {
                        return Err(ConfigError::Duplicate("--demo"));
                    }
                    config.demo = true;
                }
                "--docs" => {
                    if config.docs_root.is_some() {
                        return Err(ConfigError::Duplicate("--docs"));
                    }
                    let dir = args.next().ok_or(ConfigError::MissingValue("--docs"))?;
                    config.docs_root = Some(PathBuf::from(dir));
                }
                "--mcp-http-port" => {
                    if config.mcp_http_port.is_some() {
                        return Err(ConfigError::Duplicate("--mcp-http-port"));
                    }
                    let raw = args.next().ok_or(ConfigError::MissingValue("--mcp-http-port"))?;
                    let port = raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?;
                    config.mcp_http_port = Some(port);
                }
                _ if arg.starts_with('-') => return Err(ConfigError::UnknownOption(arg)),
                _ => {
                    if config.docs_root.is_some() {
                        return Err(ConfigError::Duplicate("--docs"));
                    }
                    config.docs_root = Some(PathBuf::from(arg));
                }
            }
        }

        if config.mcp_stdio && config.mcp_http_port.is_some() {
            return Err(ConfigError::StdioWithHttpPort);
        }
        if config.docs_root.is_none() {
            config.docs_root = env_docs_root.filter(|root| !root.as_os_str().is_empty());
        }

        Ok(config)
    }

    pub fn http_port(&self) -> u16 {
        self.mcp_http_port.unwrap_or(DEFAULT_MCP_HTTP_PORT)
    }
}
