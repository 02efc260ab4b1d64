// User-facing reply texts.

use crate::core::reaction_roles::ReactionRoleError;
use crate::core::settings::SettingsError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DIRECT_MESSAGE_REPLY: &str = "Du kannst diesen Bot nicht in Direktnachrichten benutzen.";
pub const UNBALANCED_QUOTES: &str = "Die Anführungszeichen in diesem Befehl sind nicht geschlossen.";
pub const MAY_CONFIGURE: &str = "Du darfst Einstellungen vornehmen.";
pub const MAY_NOT_CONFIGURE: &str = "Du darfst keine Einstellungen vornehmen.";
pub const ROLE_NOT_FOUND: &str = "Diese Rolle scheint es nicht zu geben.";
pub const MOD_ROLE_SET: &str = "Moderator-Rolle erfolgreich gesetzt.";
pub const MOD_ROLE_UNSET: &str = "Noch nicht gesetzt.";
pub const ROLE_LINKED: &str = "Rolle verlinkt.";
pub const ROLE_UNLINKED: &str = "Rolle gelöscht.";
pub const PACKAGE_NOT_FOUND: &str = "Das Paket scheint nicht zu existieren.";
pub const PLATFORM_REFUSED: &str = "Discord hat die Anfrage nicht angenommen.";
pub const PACKAGE_INDEX_DOWN: &str = "Die Paketdatenbank ist gerade nicht erreichbar.";
pub const ROLE_MESSAGE_OUT_OF_SYNC: &str =
    "Die Einstellung wurde gespeichert, aber die Rollen-Nachricht konnte nicht aktualisiert werden.";

/// Sent as separate messages to stay below Discord's 2000 character limit.
pub const HELP_PAGES: [&str; 3] = [
    "```md
# ARCHER(1)

## NAME
    Archer - Einfach nur ein Bot

## SYNOPSIS
    <prefix><command> [arguments]

## DESCRIPTION
    Ein Bot für den deutschen Arch Linux Server
```",
    "```md
## COMMANDS
    help
        Zeigt diese Hilfe an.

    prefix <new-prefix>
        Setzt ein neues Präfix.

    whoami
        Zeigt an, ob du Einstellungen am Bot verändern darfst.

    show
        Zeigt die aktuellen Einstellungen (Moderator-Rolle, Präfix...) an.

    leetify <args>...
        1337iziert alle gegebenen Argumente und sendet das Ergebnis zurück.

    borkify <args>...
        Macht die gegebenen Argumente kaputt, indem Anfangs- und Endbuchstaben
        vertauscht werden.

    lookup <package>
        Sucht nach dem angegebenen Paket auf https://archlinux.org/packages/ und
        gibt die Version, die Größe und das Erstellungsdatum zurück.

    set-mod-role <role-name>
        Setzt die Moderationsrolle, welche für das Verändern von Einstellungen
        benötigt wird.

    send-role-message <channel-id>
        Sendet die Nachricht mit der Rollenauswahl in den angegebenen Channel.

    add-role <emoji> <role-name>
        Fügt eine Verlinkung zu der gegebenen Rolle hinzu, welche mithilfe des
        Emojis bei der Nachricht von send-role-message hinzugefügt werden kann.

    remove-role <emoji>
        Entfernt die Verlinkung der Rolle mit dem Emoji.

    distraction-probability <probability>
        Setzt eine neue Ablenkungswahrscheinlichkeit. Die Wahrscheinlichkeit
        sollte zum Beispiel für 50 % als 50 angegeben werden, also ohne das
        Prozentzeichen.
```",
    "```md
## BUGS
    Es können nur Custom Emojis als Reaction Roles verwendet werden.
    Manchmal verselbstständigt er sich. Aber nur manchmal.

## REPORTING BUGS
    Sende einfach eine Nachricht auf dem Arch Linux Discord und pinge einen
    Moderator gleich mit.
```",
];

pub fn current_prefix(prefix: &str) -> String {
    format!("Der derzeitige Prefix ist `{}`.", prefix)
}

pub fn unknown_command(prefix: &str) -> String {
    format!("Unbekannter Befehl. Benutze `{}help` für Hilfe.", prefix)
}

pub fn permission_denied(display_name: &str, user_id: u64) -> String {
    format!(
        "{} ({}) ist nicht in der sudoers Datei. Dieser Vorfall wird gemeldet.",
        display_name, user_id
    )
}

pub fn prefix_changed(prefix: &str) -> String {
    format!("Neues Präfix ist nun `{}`.", prefix)
}

pub fn probability_changed(probability: u8) -> String {
    format!("Ablenkungswahrscheinlichkeit auf `{} %` gesetzt.", probability)
}

pub fn settings_summary(
    moderator_role: Option<&str>,
    probability: u8,
    prefix: &str,
    role_lines: &str,
) -> String {
    format!(
        "- Version: `{}`\n\
         - Moderator-Rolle: `{}`\n\
         - Ablenkungswahrscheinlichkeit: `{} %`\n\
         - Präfix: `{}`\n\
         - Reaction Roles:\n{}",
        VERSION,
        moderator_role.unwrap_or(MOD_ROLE_UNSET),
        probability,
        prefix,
        role_lines
    )
}

pub fn settings_error(err: &SettingsError) -> &'static str {
    match err {
        SettingsError::EmptyPrefix => "Das Präfix darf nicht leer sein.",
        SettingsError::ProbabilityOutOfRange(_) => "Bitte eine Zahl im Bereich von 0-100.",
        SettingsError::Store(_) => {
            "Die Änderung konnte nicht gespeichert werden und wurde verworfen."
        }
    }
}

pub fn reaction_role_error(err: &ReactionRoleError) -> &'static str {
    match err {
        ReactionRoleError::ChannelNotFound(_) => "Der Channel scheint nicht zu existieren.",
        ReactionRoleError::RoleAlreadyLinked(_) => "Die Rolle ist bereits verlinkt.",
        ReactionRoleError::EmojiAlreadyLinked(_) => "Der Emoji ist bereits mit einer Rolle verlinkt.",
        ReactionRoleError::EmojiNotInGuild(_) => "Der Emoji existiert nicht auf diesem Server.",
        ReactionRoleError::NotFound(_) => "Es gibt gar keine Rolle für diesen Emoji.",
        ReactionRoleError::Settings(e) => settings_error(e),
        ReactionRoleError::Gateway(_) => PLATFORM_REFUSED,
    }
}
