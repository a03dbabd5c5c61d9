#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use chrono::Utc;
    use uuid::Uuid;

    use crate::store::MemoryStore;
    use crate::template::interpolate::{interpolate, missing_variables};
    use crate::template::models::{CreateTemplatePayload, Template, TemplateVariable};
    use crate::template::service::TemplateService;

    fn values(pairs: &[(&str, Option<&str>)]) -> HashMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_interpolate_case_insensitive_and_whitespace_tolerant() {
        let out = interpolate(
            "Dear {{ Student_Name }}",
            &values(&[("student_name", Some("Ada"))]),
        );
        assert_eq!(out, "Dear Ada");

        let out = interpolate(
            "{{STUDENT_NAME}} / {{ student_name }} / {{student_Name }}",
            &values(&[("Student_Name", Some("Ada"))]),
        );
        assert_eq!(out, "Ada / Ada / Ada");
    }

    #[test]
    fn test_interpolate_leaves_unknown_tokens_verbatim() {
        let out = interpolate(
            "Dear {{ student_name }}, re {{unknown}}",
            &values(&[("student_name", Some("Ada"))]),
        );
        assert_eq!(out, "Dear Ada, re {{unknown}}");
    }

    #[test]
    fn test_interpolate_null_value_becomes_empty() {
        let out = interpolate(
            "Program: {{ program }}.",
            &values(&[("program", None)]),
        );
        assert_eq!(out, "Program: .");
    }

    #[test]
    fn test_interpolate_is_order_independent() {
        let text = "{{a}} {{b}} {{a}}";
        let forward = values(&[("a", Some("1")), ("b", Some("2"))]);
        let out = interpolate(text, &forward);
        assert_eq!(out, "1 2 1");
        // Same mapping, same text, same output, however the map iterates.
        assert_eq!(out, interpolate(text, &forward));
    }

    #[test]
    fn test_missing_variables_reports_uncovered_names() {
        let template = Template {
            id: Uuid::new_v4(),
            name: "t".to_string(),
            content: String::new(),
            variables: vec![
                TemplateVariable {
                    name: "student_name".to_string(),
                    description: None,
                    category: None,
                },
                TemplateVariable {
                    name: "program".to_string(),
                    description: None,
                    category: None,
                },
            ],
            is_default: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let missing = missing_variables(&template, &values(&[("Student_Name", Some("Ada"))]));
        assert_eq!(missing, vec!["program".to_string()]);
    }

    #[tokio::test]
    async fn test_single_default_template_invariant() {
        let service = TemplateService::new(Arc::new(MemoryStore::new()));

        let first = service
            .create(CreateTemplatePayload {
                name: "first".to_string(),
                content: "body".to_string(),
                variables: vec![],
                is_default: true,
            })
            .await
            .unwrap();
        let second = service
            .create(CreateTemplatePayload {
                name: "second".to_string(),
                content: "body".to_string(),
                variables: vec![],
                is_default: false,
            })
            .await
            .unwrap();

        service.set_default(&second.id).await.unwrap();

        let templates = service.list().await.unwrap();
        let defaults: Vec<_> = templates.iter().filter(|t| t.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, second.id);
        assert!(!service.get(&first.id).await.unwrap().is_default);
    }
}
