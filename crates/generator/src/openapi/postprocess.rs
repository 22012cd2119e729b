//! Document-wide cleanup applied after every service is converted

use idlbridge_common::merge::push_unique;
use idlbridge_common::openapi::{Document, Server};

/// Promote a lone tag, hoist shared servers, and sort for stable output
pub fn postprocess(document: &mut Document, default_server: &str) {
    promote_single_tag(document);
    hoist_servers(document, default_server);
    sort_document(document);
}

/// A document with one tag takes its title and description from it
///
/// Values already present in `info` are kept; the tag description is
/// cleared either way.
fn promote_single_tag(document: &mut Document) {
    let [tag] = document.tags.as_mut_slice() else {
        return;
    };
    if document.info.title.is_empty() {
        document.info.title = format!("{} API", tag.name);
    }
    if let Some(description) = tag.description.take() {
        if document.info.description.is_none() {
            document.info.description = Some(description);
        }
    }
}

/// Move servers up a tier whenever every entry below agrees
///
/// Operation servers collapse onto their path item when the operations
/// that declare servers all declare the same ones, then path servers
/// collapse onto the document. With no servers anywhere the document gets
/// `default_server`.
fn hoist_servers(document: &mut Document, default_server: &str) {
    for item in document.paths.values_mut() {
        let mut declared: Vec<Vec<Server>> = Vec::new();
        for (_, operation) in item.operations() {
            if !operation.servers.is_empty() {
                push_unique(&mut declared, operation.servers.clone(), |s| s.clone());
            }
        }
        if let [servers] = declared.as_slice() {
            item.servers = servers.clone();
            for operation in item.operations_mut() {
                operation.servers.clear();
            }
        }
    }

    let mut unique: Vec<Server> = document.servers.clone();
    for item in document.paths.values() {
        let operation_servers = item
            .operations()
            .into_iter()
            .flat_map(|(_, op)| op.servers.iter());
        for server in item.servers.iter().chain(operation_servers) {
            push_unique(&mut unique, server.clone(), |s| s.url.clone());
        }
    }

    match unique.len() {
        0 => document.servers = vec![Server::new(default_server)],
        1 => {
            for item in document.paths.values_mut() {
                item.servers.clear();
                for operation in item.operations_mut() {
                    operation.servers.clear();
                }
            }
            document.servers = unique;
        },
        _ => document.servers = unique,
    }
}

fn sort_document(document: &mut Document) {
    document.tags.sort_by(|a, b| a.name.cmp(&b.name));
    document.paths.sort_keys();
    document.components.schemas.sort_keys();
}
