//! Resource operations for MockProVisionClient

use super::helpers::{lock, matches, slugify, timestamp};
use super::MockProVisionClient;
use crate::error::ProVisionError;
use crate::models::*;
use std::collections::BTreeMap;

pub async fn get_resources(client: &MockProVisionClient, filters: &BTreeMap<String, String>) -> Result<Vec<Resource>, ProVisionError> {
    let load_attributes = filters.get("load_attributes").map(String::as_str) == Some("1");
    Ok(lock(&client.resources)
        .values()
        .filter(|r| matches(filters, "id", r.id.as_ref().map(PvId::as_str)))
        .filter(|r| matches(filters, "name", Some(&r.name)))
        .filter(|r| matches(filters, "type", Some(&r.resource_type)))
        .filter(|r| matches(filters, "slug", r.slug.as_deref()))
        .filter(|r| matches(filters, "parent_id", r.parent_id.as_ref().map(PvId::as_str)))
        .cloned()
        .map(|mut r| {
            if !load_attributes {
                r.attrs = None;
            }
            r
        })
        .collect())
}

pub async fn add_resource(client: &MockProVisionClient, resource: &Resource) -> Result<Resource, ProVisionError> {
    if resource.name.is_empty() || resource.resource_type.is_empty() {
        return Err(ProVisionError::Api("POST /resources failed: 400 - name and type are required".to_string()));
    }

    let id = PvId::from(client.next_id());
    let created = Resource {
        id: Some(id.clone()),
        parent_id: resource.parent_id.clone().or_else(|| Some(PvId::from("1"))),
        slug: resource.slug.clone().or_else(|| Some(slugify(&resource.name))),
        modified: Some(timestamp()),
        ..resource.clone()
    };
    lock(&client.resources).insert(id.to_string(), created.clone());
    Ok(created)
}

pub async fn update_resource(client: &MockProVisionClient, resource: &Resource) -> Result<Resource, ProVisionError> {
    let id = resource
        .id
        .as_ref()
        .ok_or_else(|| ProVisionError::InvalidRequest("resource has no id".to_string()))?;
    let mut resources = lock(&client.resources);
    let existing = resources
        .get_mut(id.as_str())
        .ok_or_else(|| ProVisionError::NotFound(format!("Resource {} not found", id)))?;

    existing.name = resource.name.clone();
    existing.resource_type = resource.resource_type.clone();
    if resource.parent_id.is_some() {
        existing.parent_id = resource.parent_id.clone();
    }
    if resource.slug.is_some() {
        existing.slug = resource.slug.clone();
    }
    if resource.attrs.is_some() {
        existing.attrs = resource.attrs.clone();
    }
    existing.modified = Some(timestamp());
    Ok(existing.clone())
}

pub async fn delete_resource_by_id(client: &MockProVisionClient, id: &str) -> Result<(), ProVisionError> {
    lock(&client.resources)
        .remove(id)
        .map(|_| ())
        .ok_or_else(|| ProVisionError::NotFound(format!("Resource {} not found", id)))
}
