//! Render-ready view models for the roadmap panel.
//!
//! Nothing here draws; these are the values a front end turns into markup.

use serde::Serialize;

use crate::format::{display_name_from_url, escape_html, format_detail_text, is_url};
use crate::roadmap::{Book, Listing, NodeDetail, Project, Resource, TextBlock};

/// Text shown when a node has no content.
pub const NO_DETAIL_TEXT: &str = "No detailed information available for this topic.";

/// Shown in place of the graph while the roadmap has nothing to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub title: String,
    pub prompt: String,
    pub suggestions: Vec<String>,
}

impl Default for Placeholder {
    fn default() -> Self {
        Self {
            title: "Your Agentic AI Roadmap".to_string(),
            prompt: "Tell me specifically about your interests and knowledge in agentic AI:"
                .to_string(),
            suggestions: vec![
                "I'm interested in agentic AI and I'm a beginner".to_string(),
                "I know about agentic AI frameworks and RAG".to_string(),
                "I'm advanced in agentic AI and want to learn about multi-agent systems"
                    .to_string(),
            ],
        }
    }
}

/// Everything the detail panel shows for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub title: String,
    /// Formatted content, or [`NO_DETAIL_TEXT`].
    pub content_html: String,
    pub sections: Vec<DetailSection>,
    pub resources: Vec<ResourceView>,
    pub projects: Vec<String>,
    pub books: Vec<String>,
}

/// A titled block such as "Required Skills".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSection {
    pub title: String,
    pub body: SectionBody,
}

/// Body of a detail section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "html", rename_all = "lowercase")]
pub enum SectionBody {
    Paragraph(String),
    List(Vec<String>),
}

/// One entry of the resource list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResourceView {
    Link {
        href: String,
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Text {
        text: String,
    },
}

impl DetailView {
    /// Build the panel for a node labelled `title`.
    pub fn build(title: &str, detail: Option<&NodeDetail>) -> Self {
        let Some(detail) = detail else {
            return Self::empty(title);
        };

        let content_html = match detail.content.as_deref() {
            Some(content) if !content.is_empty() => format_detail_text(content),
            _ => NO_DETAIL_TEXT.to_string(),
        };

        let sections = [
            ("Required Skills", &detail.skills),
            ("Career Progression", &detail.career_progression),
            ("Salary Expectations", &detail.salary),
        ]
        .into_iter()
        .filter_map(|(title, block)| {
            block.as_ref().map(|block| DetailSection {
                title: title.to_string(),
                body: section_body(block),
            })
        })
        .collect();

        Self {
            title: title.to_string(),
            content_html,
            sections,
            resources: detail.resources().iter().map(ResourceView::from).collect(),
            projects: detail.projects.as_ref().map(project_items).unwrap_or_default(),
            books: detail.books.as_ref().map(book_items).unwrap_or_default(),
        }
    }

    fn empty(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content_html: NO_DETAIL_TEXT.to_string(),
            sections: Vec::new(),
            resources: Vec::new(),
            projects: Vec::new(),
            books: Vec::new(),
        }
    }
}

fn section_body(block: &TextBlock) -> SectionBody {
    match block {
        TextBlock::Text(text) => SectionBody::Paragraph(format_detail_text(text)),
        TextBlock::List(items) => {
            SectionBody::List(items.iter().map(|i| format_detail_text(i)).collect())
        }
        TextBlock::Other(value) => SectionBody::Paragraph(escape_html(&value.to_string())),
    }
}

impl From<&Resource> for ResourceView {
    fn from(resource: &Resource) -> Self {
        match resource {
            Resource::Text(text) if is_url(text) => ResourceView::Link {
                href: text.clone(),
                label: display_name_from_url(text),
                description: None,
            },
            Resource::Text(text) => ResourceView::Text { text: text.clone() },
            Resource::Link(link) if !link.name.is_empty() && !link.url.is_empty() => {
                ResourceView::Link {
                    href: link.url.clone(),
                    label: link.name.clone(),
                    description: link.description.clone().filter(|d| !d.is_empty()),
                }
            }
            Resource::Link(link) => ResourceView::Text {
                text: serde_json::to_string(link).unwrap_or_default(),
            },
            Resource::Other(value) => ResourceView::Text {
                text: value.to_string(),
            },
        }
    }
}

fn project_items(projects: &Listing<Project>) -> Vec<String> {
    match projects {
        Listing::Many(items) => items
            .iter()
            .filter_map(|project| match project {
                Project::Text(text) => Some(format_detail_text(text)),
                Project::Named { name, description } => {
                    let mut html = format!("<strong>{}</strong>", escape_html(name));
                    if let Some(description) = description {
                        html.push_str(&format!("<div>{}</div>", format_detail_text(description)));
                    }
                    Some(html)
                }
                Project::Other(_) => None,
            })
            .collect(),
        Listing::One(text) => vec![format_detail_text(text)],
        Listing::Other(_) => Vec::new(),
    }
}

fn book_items(books: &Listing<Book>) -> Vec<String> {
    match books {
        Listing::Many(items) => items
            .iter()
            .filter_map(|book| match book {
                Book::Text(text) => Some(escape_html(text)),
                Book::Titled { title, author } => {
                    let mut html = format!("<strong>{}</strong>", escape_html(title));
                    if let Some(author) = author {
                        html.push_str(&format!(" by {}", escape_html(author)));
                    }
                    Some(html)
                }
                Book::Other(_) => None,
            })
            .collect(),
        Listing::One(text) => vec![escape_html(text)],
        Listing::Other(_) => Vec::new(),
    }
}
