// Bot presence.

use crate::core::settings::DEFAULT_PREFIX;
use poise::serenity_prelude as serenity;

/// Advertise the help command under the default prefix. Guilds may have
/// changed their prefix, but mentioning the bot tells them which one.
pub fn on_ready(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::playing(format!("{}help", DEFAULT_PREFIX));
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
