//! Mock target application for integration testing
//!
//! Serves the automation protocol on the socket named by `UITEST_SOCKET`
//! and models an IDE-like Welcome screen: a sessions section, a
//! recent-projects section, and an edit view with a navigation tree.
//! `create_project` and `open_project` mutate the tree the way the real
//! application would, so scenarios can be exercised end to end without a
//! real IDE.

use std::path::Path;

use serde_json::json;

use interprocess::local_socket::tokio::prelude::*;

use uitest::common::AgentError;
use uitest::driver::protocol::{Command, ReadyState, Request, Response};
use uitest::driver::transport;
use uitest::query::{ElementInfo, ObjectNode};
use uitest::session::SOCKET_ENV_VAR;

#[tokio::main]
async fn main() {
    let socket_name = match std::env::var(SOCKET_ENV_VAR) {
        Ok(name) => name,
        Err(_) => {
            eprintln!("mock-app: {} is not set", SOCKET_ENV_VAR);
            std::process::exit(2);
        }
    };

    let listener = match transport::create_listener(&socket_name).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("mock-app: failed to listen on '{}': {}", socket_name, e);
            std::process::exit(2);
        }
    };

    let mut state = MockState::new();

    // The harness probes the socket before attaching its driver, so serve
    // connections until a shutdown command arrives.
    'accept: loop {
        let conn = match listener.accept().await {
            Ok(conn) => conn,
            Err(_) => continue,
        };
        let (mut reader, mut writer) = tokio::io::split(conn);

        loop {
            let data = match transport::recv_message(&mut reader).await {
                Ok(data) => data,
                Err(_) => continue 'accept, // EOF: peer disconnected
            };

            let request: Request = match serde_json::from_slice(&data) {
                Ok(request) => request,
                Err(_) => continue 'accept,
            };

            let (response, shutdown) = state.handle(request);
            let bytes = serde_json::to_vec(&response).expect("response serializes");
            let _ = transport::send_message(&mut writer, &bytes).await;

            if shutdown {
                break 'accept;
            }
        }
    }

    let _ = uitest::common::paths::remove_socket(&socket_name);
}

struct MockState {
    tree: ObjectNode,
    plugin_errors: Vec<String>,
}

impl MockState {
    fn new() -> Self {
        let plugin_errors = match std::env::var("MOCK_APP_PLUGIN_ERROR") {
            Ok(msg) if !msg.is_empty() => vec![msg],
            _ => Vec::new(),
        };

        Self {
            tree: welcome_tree(),
            plugin_errors,
        }
    }

    fn set_current_view(&mut self, view: &str) {
        self.tree
            .properties
            .insert("currentView".to_string(), view.to_string());
    }

    fn handle(&mut self, request: Request) -> (Response, bool) {
        let id = request.id;

        match request.command {
            Command::Ready => {
                let state = ReadyState {
                    ready: self.plugin_errors.is_empty(),
                    plugin_errors: self.plugin_errors.clone(),
                };
                (
                    Response::success(id, serde_json::to_value(state).unwrap()),
                    false,
                )
            }

            Command::Query { query } => match self.tree.find(&query) {
                Ok(node) => (
                    Response::success(id, json!({ "element": node.map(ElementInfo::from) })),
                    false,
                ),
                Err(e) => (Response::error(id, AgentError::from(&e)), false),
            },

            Command::Perform { name, args } => match name.as_str() {
                "create_project" => {
                    let project = args.get("name").cloned().unwrap_or_default();
                    if project.is_empty() {
                        return (
                            Response::error(
                                id,
                                AgentError::new(
                                    "REQUEST_REJECTED",
                                    "create_project requires a 'name' argument",
                                ),
                            ),
                            false,
                        );
                    }
                    self.open_in_editor(&project);
                    (Response::ok(id), false)
                }
                "open_project" => {
                    let path = args.get("path").cloned().unwrap_or_default();
                    let project = Path::new(&path)
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    if project.is_empty() {
                        return (
                            Response::error(
                                id,
                                AgentError::new(
                                    "REQUEST_REJECTED",
                                    "open_project requires a 'path' argument",
                                ),
                            ),
                            false,
                        );
                    }
                    self.open_in_editor(&project);
                    (Response::ok(id), false)
                }
                other => (
                    Response::error(
                        id,
                        AgentError::new(
                            "REQUEST_REJECTED",
                            format!("unknown action '{}'", other),
                        ),
                    ),
                    false,
                ),
            },

            Command::SwitchView { view } => {
                if self.tree.children.iter().any(|c| c.id == view) {
                    self.set_current_view(&view);
                    (Response::ok(id), false)
                } else {
                    (
                        Response::error(
                            id,
                            AgentError::new(
                                "REQUEST_REJECTED",
                                format!("no view '{}'", view),
                            ),
                        ),
                        false,
                    )
                }
            }

            Command::Shutdown => (Response::ok(id), true),
        }
    }

    /// Open a project the way the IDE would: it lands in the navigation
    /// tree, the current view flips to edit, the recent-projects list gains
    /// an entry, and the default session becomes the current one.
    fn open_in_editor(&mut self, project: &str) {
        let nav = self
            .tree
            .resolve_scope_mut("edit.navigation")
            .expect("navigation tree exists");
        if !nav.children.iter().any(|c| c.id == project) {
            nav.children
                .push(ObjectNode::new("TreeItem", project).with_property("text", project));
        }
        self.set_current_view("edit");

        let scroll = self
            .tree
            .resolve_scope_mut("welcome.scroll_view")
            .expect("welcome scroll view exists");
        if !scroll
            .children
            .iter()
            .any(|c| c.type_name == "LinkedText" && c.properties.get("text") == Some(&project.to_string()))
        {
            scroll.children.push(
                ObjectNode::new("LinkedText", project)
                    .with_property("text", project)
                    .with_property("id", "projectNameText"),
            );
        }
        if let Some(session) = scroll
            .children
            .iter_mut()
            .find(|c| c.properties.get("id") == Some(&"text".to_string()))
        {
            session
                .properties
                .insert("text".to_string(), "default (current session)".to_string());
        }
    }
}

fn welcome_tree() -> ObjectNode {
    ObjectNode::new("Root", "app")
        .with_property("currentView", "welcome")
        .with_child(
            ObjectNode::new("View", "welcome").with_child(
                ObjectNode::new("ScrollView", "scroll_view")
                    .with_child(
                        ObjectNode::new("Button", "gettingStartedButton")
                            .with_property("text", "Get Started Now")
                            .with_property("id", "gettingStartedButton"),
                    )
                    .with_child(
                        ObjectNode::new("Text", "sessionsTitle")
                            .with_property("text", "Sessions")
                            .with_property("id", "sessionsTitle"),
                    )
                    .with_child(
                        ObjectNode::new("Text", "sessionDefault")
                            .with_property("text", "default")
                            .with_property("id", "text"),
                    )
                    .with_child(
                        ObjectNode::new("Text", "recentProjectsTitle")
                            .with_property("text", "Recent Projects")
                            .with_property("id", "recentProjectsTitle"),
                    ),
            ),
        )
        .with_child(
            ObjectNode::new("View", "edit")
                .with_child(ObjectNode::new("NavigationTree", "navigation")),
        )
}
