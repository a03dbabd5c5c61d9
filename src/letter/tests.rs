#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::letter::models::CreateLetterPayload;
    use crate::letter::service::LetterService;
    use crate::request::models::CreateRequestPayload;
    use crate::request::service::RequestService;
    use crate::store::{MemoryStore, StoreObject};
    use crate::template::models::CreateTemplatePayload;
    use crate::template::service::TemplateService;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), Some(value.to_string())))
            .collect()
    }

    #[tokio::test]
    async fn test_create_from_template_interpolates_and_versions() {
        let store: StoreObject = Arc::new(MemoryStore::new());
        let requests = RequestService::new(store.clone());
        let templates = TemplateService::new(store.clone());
        let letters = LetterService::new(store.clone());

        let request = requests.create(CreateRequestPayload::default()).await.unwrap();
        let template = templates
            .create(CreateTemplatePayload {
                name: "basic".to_string(),
                content: "Dear {{ recipient }}, I recommend {{ Student_Name }}.".to_string(),
                variables: vec![],
                is_default: false,
            })
            .await
            .unwrap();

        let first = letters
            .create(
                &request.id,
                CreateLetterPayload {
                    template_id: Some(template.id),
                    variables: values(&[("recipient", "Dr. Smith"), ("student_name", "Ada")]),
                    content: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(first.content, "Dear Dr. Smith, I recommend Ada.");
        assert_eq!(first.template_id, Some(template.id));

        let second = letters
            .create(
                &request.id,
                CreateLetterPayload {
                    template_id: None,
                    variables: HashMap::new(),
                    content: Some("Rewritten by hand.".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(second.version, 2);
        assert_eq!(second.template_id, None);
    }

    #[tokio::test]
    async fn test_create_requires_template_or_content() {
        let store: StoreObject = Arc::new(MemoryStore::new());
        let requests = RequestService::new(store.clone());
        let letters = LetterService::new(store.clone());

        let request = requests.create(CreateRequestPayload::default()).await.unwrap();
        let result = letters
            .create(&request.id, CreateLetterPayload::default())
            .await;
        assert!(result.is_err());
    }
}
