/// What an element holds before it is mounted into a [`Document`](crate::Document).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Content {
    #[default]
    None,
    /// Plain text. Mounted as a single text node child.
    Text(String),
    Children(Vec<super::Element>),
}

impl Content {
    /// Concatenated text of this content and everything below it.
    pub fn text(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Text(s) => s.clone(),
            Self::Children(children) => children.iter().map(|c| c.content.text()).collect(),
        }
    }
}
