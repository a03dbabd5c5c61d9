use chrono::Utc;
use uuid::Uuid;

use crate::error::{Result, ServiceError};
use crate::store::StoreObject;
use crate::template::models::{CreateTemplatePayload, Template, UpdateTemplatePayload};

pub struct TemplateService {
    store: StoreObject,
}

impl TemplateService {
    pub fn new(store: StoreObject) -> Self {
        Self { store }
    }

    pub async fn create(&self, payload: CreateTemplatePayload) -> Result<Template> {
        let now = Utc::now();
        let template = Template {
            id: Uuid::new_v4(),
            name: payload.name,
            content: payload.content,
            variables: payload.variables,
            is_default: payload.is_default,
            created_at: now,
            updated_at: now,
        };
        // The store unsets any previous default when this one claims it.
        self.store.insert_template(&template).await?;
        log::info!("created template {}", template.id);
        Ok(template)
    }

    pub async fn get(&self, id: &Uuid) -> Result<Template> {
        self.store
            .find_template(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("template", id))
    }

    pub async fn list(&self) -> Result<Vec<Template>> {
        Ok(self.store.list_templates().await?)
    }

    pub async fn update(&self, id: &Uuid, payload: UpdateTemplatePayload) -> Result<Template> {
        let mut template = self.get(id).await?;
        if let Some(name) = payload.name {
            template.name = name;
        }
        if let Some(content) = payload.content {
            template.content = content;
        }
        if let Some(variables) = payload.variables {
            template.variables = variables;
        }
        if let Some(is_default) = payload.is_default {
            template.is_default = is_default;
        }
        template.updated_at = Utc::now();
        self.store.update_template(&template).await?;
        Ok(template)
    }

    /// Make this template the default, atomically unseating the previous one.
    pub async fn set_default(&self, id: &Uuid) -> Result<Template> {
        let template = self
            .store
            .set_default_template(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("template", id))?;
        log::info!("template {id} is now the default");
        Ok(template)
    }

    pub async fn delete(&self, id: &Uuid) -> Result<Template> {
        self.store
            .delete_template(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("template", id))
    }
}
