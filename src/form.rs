use crate::model::SearchQuery;

/// Raw text from the search screen's input fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub query: String,
    pub cuisine: String,
    pub diet: String,
    pub max_calories: String,
}

impl SearchForm {
    /// Map the form to a query. Blank fields and a calorie bound that isn't a
    /// non-negative integer are dropped rather than rejected.
    pub fn to_query(&self) -> SearchQuery {
        SearchQuery {
            query: non_blank(&self.query),
            cuisine: non_blank(&self.cuisine),
            diet: non_blank(&self.diet),
            max_calories: self.max_calories.trim().parse().ok(),
            ..SearchQuery::default()
        }
    }
}

impl From<&SearchForm> for SearchQuery {
    fn from(form: &SearchForm) -> Self {
        form.to_query()
    }
}

fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_has_no_filters() {
        let query = SearchForm::default().to_query();
        assert_eq!(query, SearchQuery::default());
    }

    #[test]
    fn test_blank_fields_become_absent() {
        let form = SearchForm {
            query: "   ".to_string(),
            cuisine: "Italian".to_string(),
            diet: "\t".to_string(),
            max_calories: String::new(),
        };
        let query = form.to_query();
        assert!(query.query.is_none());
        assert_eq!(query.cuisine.as_deref(), Some("Italian"));
        assert!(query.diet.is_none());
        assert!(query.max_calories.is_none());
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let form = SearchForm {
            query: " chicken curry ".to_string(),
            ..SearchForm::default()
        };
        assert_eq!(form.to_query().query.as_deref(), Some(" chicken curry "));
    }

    #[test]
    fn test_max_calories_parsing() {
        let parse = |raw: &str| {
            SearchForm {
                max_calories: raw.to_string(),
                ..SearchForm::default()
            }
            .to_query()
            .max_calories
        };

        assert_eq!(parse("500"), Some(500));
        assert_eq!(parse(" 800 "), Some(800));
        assert_eq!(parse("0"), Some(0));
        assert_eq!(parse("-100"), None);
        assert_eq!(parse("lots"), None);
        assert_eq!(parse("12.5"), None);
    }

    #[test]
    fn test_page_size_stays_fixed() {
        let form = SearchForm {
            query: "pasta".to_string(),
            ..SearchForm::default()
        };
        assert_eq!(form.to_query().number, 10);
    }
}
