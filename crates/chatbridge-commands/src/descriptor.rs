//! Command metadata and the descriptor built from it.
//!
//! A [`CommandDescriptor`] is immutable once it has been patched, except for
//! its [`RemoteId`], which is written after the command list has been
//! deployed to Discord.

use crate::error::CommandError;
use chatbridge_i18n::{I18n, LocalizationMap};
use parking_lot::RwLock;
use std::fmt;

/// Default cooldown applied when a command does not set one.
pub const DEFAULT_COOLDOWN_SECONDS: u64 = 3;

/// Display grouping used by `/help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandGroup {
    /// Everything that doesn't belong anywhere more specific.
    General,
}

impl CommandGroup {
    /// Every group in display order.
    pub const ALL: [Self; 1] = [Self::General];

    /// Translation key of the group name.
    pub const fn i18n_key(self) -> &'static str {
        match self {
            Self::General => "command-groups-general",
        }
    }

    /// Group name in `locale`.
    pub fn localized_name(self, i18n: &I18n, locale: &str) -> String {
        i18n.t(self.i18n_key(), locale, None)
    }
}

/// The three kinds of application command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// A slash command.
    ChatInput,
    /// A command in a message's context menu.
    MessageContext,
    /// A command in a user's context menu.
    UserContext,
}

/// Where a command can be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstallScopes {
    /// Installable to guilds.
    pub guild_installed: bool,
    /// Installable to users.
    pub user_installed: bool,
}

impl InstallScopes {
    /// Guild and user installable.
    pub const BOTH: Self = Self {
        guild_installed: true,
        user_installed: true,
    };

    /// Only guild installable.
    pub const GUILD: Self = Self {
        guild_installed: true,
        user_installed: false,
    };

    /// Only user installable.
    pub const USER: Self = Self {
        guild_installed: false,
        user_installed: true,
    };

    /// Whether neither scope is set.
    pub const fn is_empty(self) -> bool {
        !self.guild_installed && !self.user_installed
    }

    /// The integration types Discord expects, user install first.
    pub fn integration_types(self) -> Vec<IntegrationType> {
        let mut types = Vec::with_capacity(2);
        if self.user_installed {
            types.push(IntegrationType::UserInstall);
        }
        if self.guild_installed {
            types.push(IntegrationType::GuildInstall);
        }
        types
    }
}

/// How a command is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrationType {
    /// Installed to a guild.
    GuildInstall,
    /// Installed to a user.
    UserInstall,
}

impl fmt::Display for IntegrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GuildInstall => "guild",
            Self::UserInstall => "user",
        })
    }
}

/// Where an interaction can be triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionContextKind {
    /// Inside a guild.
    Guild,
    /// In the bot's DM channel.
    BotDm,
    /// In group DMs and DMs other than the bot's.
    PrivateChannel,
}

impl InteractionContextKind {
    /// Every context.
    pub const ALL: [Self; 3] = [Self::Guild, Self::BotDm, Self::PrivateChannel];
}

/// The contexts a command may be used in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contexts {
    /// Every context.
    All,
    /// An explicit, non-empty subset.
    Only(Vec<InteractionContextKind>),
}

impl Contexts {
    fn resolve(&self) -> Vec<InteractionContextKind> {
        match self {
            Self::All => InteractionContextKind::ALL.to_vec(),
            Self::Only(contexts) => {
                let mut resolved = Vec::with_capacity(contexts.len());
                for context in contexts {
                    if !resolved.contains(context) {
                        resolved.push(*context);
                    }
                }
                resolved
            }
        }
    }
}

/// Field of a descriptor that has localisations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalizedField {
    /// Command name.
    Name,
    /// Command description.
    Description,
    /// Longer help text shown by `/help <command>`.
    HelpText,
}

/// Everything a command declares about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMetadata {
    /// Unique command name.
    pub name: String,
    /// Localised names.
    pub name_localizations: LocalizationMap,
    /// Description shown in Discord's command picker.
    pub description: String,
    /// Localised descriptions.
    pub description_localizations: LocalizationMap,
    /// Optional longer help text.
    pub help_text: Option<String>,
    /// Localised help texts.
    pub help_text_localizations: LocalizationMap,
    /// Cooldown after a successful run.
    pub cooldown_seconds: u64,
    /// Display group.
    pub group: CommandGroup,
    /// Restrict the command to the developer allow-list.
    pub developer_only: bool,
    /// Install scopes.
    pub install_scopes: InstallScopes,
    /// Usable contexts.
    pub contexts: Contexts,
}

impl CommandMetadata {
    /// Metadata with the default cooldown, the general group and no
    /// localisations.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        install_scopes: InstallScopes,
        contexts: Contexts,
    ) -> Self {
        Self {
            name: name.into(),
            name_localizations: LocalizationMap::new(),
            description: description.into(),
            description_localizations: LocalizationMap::new(),
            help_text: None,
            help_text_localizations: LocalizationMap::new(),
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
            group: CommandGroup::General,
            developer_only: false,
            install_scopes,
            contexts,
        }
    }

    /// Sets the localised names.
    #[must_use]
    pub fn name_localizations(mut self, localizations: LocalizationMap) -> Self {
        self.name_localizations = localizations;
        self
    }

    /// Sets the localised descriptions.
    #[must_use]
    pub fn description_localizations(mut self, localizations: LocalizationMap) -> Self {
        self.description_localizations = localizations;
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    /// Sets the localised help texts.
    #[must_use]
    pub fn help_text_localizations(mut self, localizations: LocalizationMap) -> Self {
        self.help_text_localizations = localizations;
        self
    }

    /// Sets the cooldown.
    #[must_use]
    pub fn cooldown(mut self, seconds: u64) -> Self {
        self.cooldown_seconds = seconds;
        self
    }

    /// Sets the display group.
    #[must_use]
    pub fn group(mut self, group: CommandGroup) -> Self {
        self.group = group;
        self
    }

    /// Restricts the command to developers.
    #[must_use]
    pub fn developer_only(mut self) -> Self {
        self.developer_only = true;
        self
    }
}

/// A string option of a chat-input command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    /// Option name.
    pub name: String,
    /// Localised names.
    pub name_localizations: LocalizationMap,
    /// Option description.
    pub description: String,
    /// Localised descriptions.
    pub description_localizations: LocalizationMap,
    /// Whether the option must be given.
    pub required: bool,
    /// Whether Discord should ask the bot for suggestions.
    pub autocomplete: bool,
}

impl CommandOption {
    /// An optional string option without autocomplete.
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_localizations: LocalizationMap::new(),
            description: description.into(),
            description_localizations: LocalizationMap::new(),
            required: false,
            autocomplete: false,
        }
    }

    /// Sets the localised names.
    #[must_use]
    pub fn name_localizations(mut self, localizations: LocalizationMap) -> Self {
        self.name_localizations = localizations;
        self
    }

    /// Sets the localised descriptions.
    #[must_use]
    pub fn description_localizations(mut self, localizations: LocalizationMap) -> Self {
        self.description_localizations = localizations;
        self
    }

    /// Marks the option as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Enables autocomplete.
    #[must_use]
    pub fn autocomplete(mut self) -> Self {
        self.autocomplete = true;
        self
    }
}

/// The id Discord assigned to a deployed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemoteId(pub u64);

impl RemoteId {
    /// Placeholder until the command has been deployed.
    pub const UNASSIGNED: Self = Self(0);

    /// Whether Discord has assigned an id yet.
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Patched {
    contexts: Vec<InteractionContextKind>,
    integration_types: Vec<IntegrationType>,
}

/// A validated command definition.
#[derive(Debug)]
pub struct CommandDescriptor {
    metadata: CommandMetadata,
    kind: CommandKind,
    options: Vec<CommandOption>,
    patched: Option<Patched>,
    remote_id: RwLock<RemoteId>,
}

impl CommandDescriptor {
    /// Validates `metadata` for a command of the given kind.
    pub fn new(metadata: CommandMetadata, kind: CommandKind) -> Result<Self, CommandError> {
        if metadata.install_scopes.is_empty() {
            return Err(CommandError::NoInstallContext {
                command: metadata.name,
            });
        }

        if matches!(&metadata.contexts, Contexts::Only(contexts) if contexts.is_empty()) {
            return Err(CommandError::NoInteractionContext {
                command: metadata.name,
            });
        }

        Ok(Self {
            metadata,
            kind,
            options: Vec::new(),
            patched: None,
            remote_id: RwLock::new(RemoteId::UNASSIGNED),
        })
    }

    /// Adds the options of a chat-input command.
    #[must_use]
    pub fn with_options(mut self, options: Vec<CommandOption>) -> Self {
        self.options = options;
        self
    }

    /// Resolves contexts and integration types. Calling it again is a no-op.
    pub fn patch(&mut self) -> &mut Self {
        if self.patched.is_none() {
            self.patched = Some(Patched {
                contexts: self.metadata.contexts.resolve(),
                integration_types: self.metadata.install_scopes.integration_types(),
            });
        }
        self
    }

    /// Whether [`patch`](Self::patch) has run.
    pub const fn is_patched(&self) -> bool {
        self.patched.is_some()
    }

    /// Resolved contexts, empty before patching.
    pub fn contexts(&self) -> &[InteractionContextKind] {
        self.patched.as_ref().map_or(&[][..], |p| p.contexts.as_slice())
    }

    /// Resolved integration types, empty before patching.
    pub fn integration_types(&self) -> &[IntegrationType] {
        self.patched.as_ref().map_or(&[][..], |p| p.integration_types.as_slice())
    }

    /// Command name.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Command description.
    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    /// Full metadata.
    pub const fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    /// Command kind.
    pub const fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Chat-input options.
    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }

    /// Cooldown after a successful run.
    pub const fn cooldown_seconds(&self) -> u64 {
        self.metadata.cooldown_seconds
    }

    /// Display group.
    pub const fn group(&self) -> CommandGroup {
        self.metadata.group
    }

    /// Whether the command is restricted to developers.
    pub const fn developer_only(&self) -> bool {
        self.metadata.developer_only
    }

    /// Install scopes.
    pub const fn install_scopes(&self) -> InstallScopes {
        self.metadata.install_scopes
    }

    /// The id Discord assigned, or [`RemoteId::UNASSIGNED`].
    pub fn remote_id(&self) -> RemoteId {
        *self.remote_id.read()
    }

    /// Stores the id Discord assigned.
    pub fn set_remote_id(&self, id: RemoteId) {
        *self.remote_id.write() = id;
    }

    /// `field` in `locale`, falling back to the base value. Only the help
    /// text can be absent.
    pub fn localized(&self, field: LocalizedField, locale: &str) -> Option<&str> {
        let metadata = &self.metadata;
        match field {
            LocalizedField::Name => Some(
                metadata
                    .name_localizations
                    .get(locale)
                    .map_or(metadata.name.as_str(), String::as_str),
            ),
            LocalizedField::Description => Some(
                metadata
                    .description_localizations
                    .get(locale)
                    .map_or(metadata.description.as_str(), String::as_str),
            ),
            LocalizedField::HelpText => metadata
                .help_text_localizations
                .get(locale)
                .map(String::as_str)
                .or(metadata.help_text.as_deref()),
        }
    }

    /// How the command is shown to users: a clickable mention for slash
    /// commands, `` `* name` `` for context menu entries.
    pub fn mention(&self) -> String {
        match self.kind {
            CommandKind::ChatInput => format!("</{}:{}>", self.metadata.name, self.remote_id()),
            CommandKind::MessageContext | CommandKind::UserContext => format!("`* {}`", self.metadata.name),
        }
    }

    /// How the command is written in log lines.
    pub fn log_name(&self) -> String {
        match self.kind {
            CommandKind::ChatInput => format!("/{}", self.metadata.name),
            CommandKind::MessageContext | CommandKind::UserContext => format!("* {}", self.metadata.name),
        }
    }
}

impl fmt::Display for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mention())
    }
}
