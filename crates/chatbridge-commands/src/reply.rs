//! Response model independent of the Discord library.

/// Embed colour presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedKind {
    /// Something went wrong or is not allowed.
    Error,
    /// Neutral information.
    Info,
    /// An action succeeded.
    Success,
}

impl EmbedKind {
    /// RGB colour of the preset.
    pub const fn color(self) -> u32 {
        match self {
            Self::Error => 0x00ED_4245,
            Self::Info => 0x0058_65F2,
            Self::Success => 0x0057_F287,
        }
    }
}

/// One embed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    /// Field title.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Render next to other inline fields.
    pub inline: bool,
}

/// Embed footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedFooter {
    /// Footer text.
    pub text: String,
    /// Footer icon.
    pub icon_url: Option<String>,
}

/// A rich embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    /// Title.
    pub title: Option<String>,
    /// Body.
    pub description: Option<String>,
    /// Sidebar colour.
    pub color: u32,
    /// Fields in order.
    pub fields: Vec<EmbedField>,
    /// Thumbnail image.
    pub thumbnail: Option<String>,
    /// Footer.
    pub footer: Option<EmbedFooter>,
    /// Show the current time.
    pub timestamp: bool,
}

impl Embed {
    /// An empty embed of the given kind.
    pub const fn new(kind: EmbedKind) -> Self {
        Self {
            title: None,
            description: None,
            color: kind.color(),
            fields: Vec::new(),
            thumbnail: None,
            footer: None,
            timestamp: false,
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Sets the thumbnail.
    #[must_use]
    pub fn thumbnail(mut self, url: Option<String>) -> Self {
        self.thumbnail = url;
        self
    }

    /// Sets the footer.
    #[must_use]
    pub fn footer(mut self, text: impl Into<String>, icon_url: Option<String>) -> Self {
        self.footer = Some(EmbedFooter {
            text: text.into(),
            icon_url,
        });
        self
    }

    /// Shows the current time.
    #[must_use]
    pub fn timestamp(mut self) -> Self {
        self.timestamp = true;
        self
    }
}

/// Shorthand for an embed whose body is `message`.
pub fn emb(kind: EmbedKind, message: impl Into<String>) -> Embed {
    Embed::new(kind).description(message)
}

/// A button that opens a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    /// Button text.
    pub label: String,
    /// Target URL.
    pub url: String,
    /// Optional emoji shown before the label.
    pub emoji: Option<char>,
}

/// A message sent in response to an interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Plain text.
    pub content: Option<String>,
    /// Embeds.
    pub embeds: Vec<Embed>,
    /// Link buttons, rendered in one row.
    pub buttons: Vec<LinkButton>,
    /// Only visible to the invoking user.
    pub ephemeral: bool,
}

impl Reply {
    /// A plain text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// A reply with one embed.
    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }

    /// Makes the reply ephemeral.
    #[must_use]
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// Appends a link button.
    #[must_use]
    pub fn button(mut self, label: impl Into<String>, url: impl Into<String>, emoji: Option<char>) -> Self {
        self.buttons.push(LinkButton {
            label: label.into(),
            url: url.into(),
            emoji,
        });
        self
    }
}
