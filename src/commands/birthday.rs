use poise::CreateReply;
use tracing::info;

use crate::birthday::BirthdayRecord;
use crate::store::Upsert;
use crate::{Context, Error};

async fn reply_private(ctx: Context<'_>, text: impl Into<String>) -> Result<(), Error> {
    ctx.send(CreateReply::default().content(text).ephemeral(true))
        .await?;
    Ok(())
}

/// Adds your birthday so the server gets reminded. Replaces an existing one.
#[poise::command(slash_command, guild_only, rename = "birthday-add")]
pub async fn birthday_add(
    ctx: Context<'_>,
    #[description = "Month (1-12)"] month: u32,
    #[description = "Day of the month"] day: u32,
    #[description = "Year you were born"] year: Option<i32>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("this command only works in a server")?;

    let record = match BirthdayRecord::new(month, day, year, guild_id.get()) {
        Ok(record) => record,
        Err(e) => return reply_private(ctx, format!("That doesn't look right: {e}")).await,
    };

    let status = {
        let mut store = ctx.data().birthdays.lock().await;
        store.reload()?;
        let status = store.upsert(ctx.author().id.to_string(), record);
        store.dump()?;
        status
    };
    info!("birthday for {} {status:?}", ctx.author().name);

    let response = match status {
        Upsert::Added => "Added your birthday",
        Upsert::Replaced => "Replaced your birthday",
    };
    reply_private(ctx, response).await
}

/// Deletes your birthday from the tracker if it exists
#[poise::command(slash_command, rename = "birthday-delete")]
pub async fn birthday_delete(ctx: Context<'_>) -> Result<(), Error> {
    {
        let mut store = ctx.data().birthdays.lock().await;
        store.reload()?;
        if store.remove(&ctx.author().id.to_string()).is_some() {
            store.dump()?;
        }
    }
    reply_private(ctx, "Deleted your birthday").await
}
