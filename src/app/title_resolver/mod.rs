// Title resolver - Progressive narrowing of a disc label against the metadata service

use std::sync::Arc;

use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Resolves a noisy disc label into a title match.
///
/// Lookup failures of any kind count as "not found" for that query; the
/// resolver never returns an error.
pub struct TitleResolver {
    lookup: Arc<dyn MetadataLookupPort>,
}

impl TitleResolver {
    pub fn new(lookup: Arc<dyn MetadataLookupPort>) -> Self {
        Self { lookup }
    }

    pub async fn resolve(&self, label: &str) -> TitleResolution {
        let plan = QueryPlan::new(label);
        tracing::debug!(label, max_attempts = plan.max_attempts(), "Resolving title");

        let mut attempts = 0;
        for query in plan {
            attempts += 1;
            tracing::debug!(query = %query, attempt = attempts, "Trying title");
            match self.lookup.query(&query, None).await {
                Ok(Some(matched)) => {
                    tracing::info!(
                        query = %query,
                        title = matched.title.as_deref().unwrap_or(""),
                        year = %matched.year,
                        category = %matched.category,
                        "Title resolved"
                    );
                    return TitleResolution::Resolved {
                        query,
                        matched,
                        attempts,
                    };
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(query = %query, error = %e, "Webservice failed"),
            }
        }

        tracing::info!(label, attempts, "Title could not be resolved; using disc label");
        TitleResolution::Unresolved { attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Accepts exactly one query string
    struct SingleAnswer {
        accepts: &'static str,
        fail_others: bool,
        queries: Mutex<Vec<String>>,
    }

    impl SingleAnswer {
        fn new(accepts: &'static str) -> Self {
            Self {
                accepts,
                fail_others: false,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MetadataLookupPort for SingleAnswer {
        async fn query(
            &self,
            title: &str,
            _year: Option<&str>,
        ) -> Result<Option<TitleMatch>, DomainError> {
            self.queries.lock().unwrap().push(title.to_string());
            if title == self.accepts {
                Ok(Some(TitleMatch {
                    title: Some(title.replace('+', " ")),
                    year: "1999".to_string(),
                    category: VideoCategory::Movie,
                }))
            } else if self.fail_others {
                Err(DomainError::Network("connection refused".to_string()))
            } else {
                Ok(None)
            }
        }
    }

    #[tokio::test]
    async fn test_primary_query_hits_first() {
        let lookup = Arc::new(SingleAnswer::new("THE+MATRIX"));
        let resolver = TitleResolver::new(Arc::clone(&lookup) as Arc<dyn MetadataLookupPort>);
        let resolution = resolver.resolve("THE_MATRIX").await;
        assert!(resolution.is_resolved());
        assert_eq!(resolution.attempts(), 1);
        assert_eq!(lookup.queries(), vec!["THE+MATRIX"]);
    }

    #[tokio::test]
    async fn test_hyphen_step_resolves_before_narrowing() {
        let lookup = Arc::new(SingleAnswer::new("The+Matrix"));
        let resolver = TitleResolver::new(Arc::clone(&lookup) as Arc<dyn MetadataLookupPort>);
        let resolution = resolver.resolve("The_Matrix-Director_Cut").await;
        match resolution {
            TitleResolution::Resolved {
                query, attempts, ..
            } => {
                assert_eq!(query, "The+Matrix");
                assert_eq!(attempts, 2);
            }
            other => panic!("expected resolution, got {:?}", other),
        }
        assert_eq!(
            lookup.queries(),
            vec!["The+Matrix-Director+Cut", "The+Matrix"]
        );
    }

    #[tokio::test]
    async fn test_narrowing_strips_trailing_words() {
        let lookup = Arc::new(SingleAnswer::new("STAR+WARS"));
        let resolver = TitleResolver::new(Arc::clone(&lookup) as Arc<dyn MetadataLookupPort>);
        let resolution = resolver.resolve("STAR_WARS_DISC_2").await;
        assert!(resolution.is_resolved());
        assert_eq!(
            lookup.queries(),
            vec!["STAR+WARS+DISC+2", "STAR+WARS+DISC", "STAR+WARS"]
        );
    }

    #[tokio::test]
    async fn test_exhausted_plan_is_unresolved_and_bounded() {
        let lookup = Arc::new(SingleAnswer {
            fail_others: true,
            ..SingleAnswer::new("nothing matches this")
        });
        let resolver = TitleResolver::new(Arc::clone(&lookup) as Arc<dyn MetadataLookupPort>);
        let label = "SOME LONG-DISC LABEL HERE";
        let resolution = resolver.resolve(label).await;
        assert_eq!(resolution, TitleResolution::Unresolved { attempts: 5 });

        let words = query_word_count(&normalize_query(label));
        assert!(lookup.queries().len() <= 1 + 1 + words);
    }

    #[tokio::test]
    async fn test_empty_label_makes_no_calls() {
        let lookup = Arc::new(SingleAnswer::new("x"));
        let resolver = TitleResolver::new(Arc::clone(&lookup) as Arc<dyn MetadataLookupPort>);
        let resolution = resolver.resolve("   ").await;
        assert_eq!(resolution, TitleResolution::Unresolved { attempts: 0 });
        assert!(lookup.queries().is_empty());
    }
}
