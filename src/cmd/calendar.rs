//! Calendar command - export due dates as an iCalendar file

use crate::cmd::{maybe_open, ProfileArgs};
use crate::config::Config;
use crate::export::ics::write_calendar;
use chrono::Utc;
use clap::Args;

#[derive(Args, Debug)]
pub struct CalendarCommand {
    #[command(flatten)]
    profile: ProfileArgs,

    /// Open the calendar file after writing it
    #[arg(long)]
    open: bool,
}

impl CalendarCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let assessment = self.profile.assess(config)?;
        let path = write_calendar(&assessment, Utc::now(), config.output_dir())?;
        println!("Calendar saved: {}", path.display());
        maybe_open(&path, self.open)
    }
}
