//! Harness-side client for the automation agent

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::io::{ReadHalf, WriteHalf};

use crate::common::{AgentError, Error, Result};
use crate::query::{ElementInfo, UiQuery};

use super::protocol::{Command, ReadyState, Request, Response};
use super::transport::{self, Stream};
use super::UiDriver;

/// Driver speaking the automation protocol over a local socket
pub struct SocketDriver {
    reader: ReadHalf<Stream>,
    writer: WriteHalf<Stream>,
    next_id: u64,
}

impl SocketDriver {
    /// Connect to the agent listening at `socket_name`
    pub async fn connect(socket_name: &str) -> Result<Self> {
        let stream = transport::connect(socket_name).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound
                || e.kind() == std::io::ErrorKind::ConnectionRefused
            {
                Error::AgentNotListening(socket_name.to_string())
            } else {
                Error::AgentConnectionFailed(e)
            }
        })?;

        let (reader, writer) = tokio::io::split(stream);

        Ok(Self {
            reader,
            writer,
            next_id: 1,
        })
    }

    /// Send a command and wait for the response
    async fn send_command(&mut self, command: Command) -> Result<serde_json::Value> {
        let id = self.next_id;
        self.next_id += 1;

        let request = Request { id, command };
        let json = serde_json::to_vec(&request)?;

        transport::send_message(&mut self.writer, &json)
            .await
            .map_err(|e| Error::AgentCommunication(e.to_string()))?;

        let response_data = transport::recv_message(&mut self.reader)
            .await
            .map_err(|e| Error::AgentCommunication(e.to_string()))?;

        let response: Response = serde_json::from_slice(&response_data)?;

        if response.id != id {
            return Err(Error::AgentCommunication(format!(
                "Response ID mismatch: expected {}, got {}",
                id, response.id
            )));
        }

        if response.success {
            Ok(response.result.unwrap_or(serde_json::json!({})))
        } else {
            let error = response
                .error
                .unwrap_or_else(|| AgentError::new("UNKNOWN", "Unknown error"));
            Err(error.into())
        }
    }
}

#[async_trait]
impl UiDriver for SocketDriver {
    async fn ready(&mut self) -> Result<ReadyState> {
        let result = self.send_command(Command::Ready).await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn find(&mut self, query: &UiQuery) -> Result<Option<ElementInfo>> {
        let result = self
            .send_command(Command::Query {
                query: query.clone(),
            })
            .await?;
        Ok(serde_json::from_value(result["element"].clone())?)
    }

    async fn perform(&mut self, name: &str, args: &BTreeMap<String, String>) -> Result<()> {
        self.send_command(Command::Perform {
            name: name.to_string(),
            args: args.clone(),
        })
        .await?;
        Ok(())
    }

    async fn switch_view(&mut self, view: &str) -> Result<()> {
        self.send_command(Command::SwitchView {
            view: view.to_string(),
        })
        .await?;
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<()> {
        // The agent may close the connection instead of answering; treat a
        // torn-down socket as a completed shutdown.
        match self.send_command(Command::Shutdown).await {
            Ok(_) => Ok(()),
            Err(Error::AgentCommunication(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
