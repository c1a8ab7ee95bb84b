//! Ask command - interactive questionnaire

use crate::cmd::{classify, result};
use crate::config::Config;
use crate::core::Assessment;
use crate::session::SessionStore;
use crate::wizard::{PromptKind, Step, Wizard, WizardError};
use anyhow::bail;
use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::Args;
use std::io::{self, BufRead, Write};

#[derive(Args, Debug)]
pub struct AskCommand {
    /// Tax year (default: current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Do not overwrite the saved session
    #[arg(long)]
    no_save: bool,
}

enum Reply {
    Yes,
    No,
    Back,
    Reset,
    Text(String),
}

impl AskCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let year = self.year.unwrap_or_else(|| Local::now().year());
        let mut wizard = Wizard::new(year, config.default_reminders());
        let store = SessionStore::new(config.data_dir());

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut asked_pos = false;

        println!("Pinoy Tax Assistant ({}). Type 'back' or 'reset' at any time.", year);

        while let Some(prompt) = wizard.prompt() {
            // the POS/CAS question only matters once registration is known
            if wizard.step() == Step::Income && wizard.answers().has_bir && !asked_pos {
                let answer = ask_yes_no(&mut input, "Gumagamit ka ba ng POS o CAS?")?;
                wizard.answers_mut().uses_pos = answer;
                asked_pos = true;
            }

            println!();
            println!("{}", prompt.progress);
            let hint = match prompt.kind {
                PromptKind::YesNo => "[y/n]",
                PromptKind::Amount => "₱",
            };
            let reply = read_reply(&mut input, &format!("{} {}", prompt.question, hint))?;

            let outcome = match (reply, prompt.kind) {
                (Reply::Back, _) => {
                    if wizard.step() == Step::Income {
                        asked_pos = false;
                    }
                    wizard.back();
                    continue;
                }
                (Reply::Reset, _) => {
                    wizard.reset();
                    asked_pos = false;
                    store.clear()?;
                    println!("Nagsimula ulit.");
                    continue;
                }
                (Reply::Yes, PromptKind::YesNo) => wizard.answer(true),
                (Reply::No, PromptKind::YesNo) => wizard.answer(false),
                (Reply::Text(text), PromptKind::Amount) => wizard.save_income(&text),
                (Reply::Yes | Reply::No, PromptKind::Amount) => {
                    println!("Pakilagay ang tamang halaga.");
                    continue;
                }
                (Reply::Text(_), PromptKind::YesNo) => {
                    println!("Sagutin ng 'y' o 'n'.");
                    continue;
                }
            };

            match outcome {
                Ok(_) => {}
                Err(WizardError::Input(e)) => println!("{}", e),
                Err(e) => return Err(e.into()),
            }
        }

        if wizard.answers().elects_eight_percent() {
            let declared_on = ask_declaration(&mut input, year)?;
            wizard.answers_mut().eight_percent_declared_on = declared_on;
        }

        let assessment = Assessment::new(wizard.answers().clone(), Local::now().date_naive());
        println!();
        if self.json {
            classify::print_json(&assessment)?;
        } else {
            print!("{}", result::render(&assessment, true));
        }
        if !self.no_save {
            store.save(&assessment, Utc::now())?;
        }
        Ok(())
    }
}

fn read_line(input: &mut impl BufRead, question: &str) -> anyhow::Result<String> {
    print!("{} ", question);
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("Input ended before the questionnaire was finished");
    }
    Ok(line.trim().to_string())
}

fn read_reply(input: &mut impl BufRead, question: &str) -> anyhow::Result<Reply> {
    let line = read_line(input, question)?;
    Ok(match line.to_lowercase().as_str() {
        "y" | "yes" | "oo" | "opo" => Reply::Yes,
        "n" | "no" | "hindi" => Reply::No,
        "back" | "b" => Reply::Back,
        "reset" => Reply::Reset,
        _ => Reply::Text(line),
    })
}

fn ask_yes_no(input: &mut impl BufRead, question: &str) -> anyhow::Result<bool> {
    loop {
        match read_reply(input, &format!("{} [y/n]", question))? {
            Reply::Yes => return Ok(true),
            Reply::No => return Ok(false),
            _ => println!("Sagutin ng 'y' o 'n'."),
        }
    }
}

/// When the 8% option was declared. Electing it at registration counts from the start of the year.
fn ask_declaration(input: &mut impl BufRead, year: i32) -> anyhow::Result<Option<NaiveDate>> {
    let question = "Kailan mo dineklara ang 8% option? [r = sa BIR registration / YYYY-MM-DD / n = hindi pa]";
    loop {
        let line = read_line(input, question)?;
        match line.to_lowercase().as_str() {
            "r" | "registration" => return Ok(NaiveDate::from_ymd_opt(year, 1, 1)),
            "n" | "no" | "hindi" | "hindi pa" => return Ok(None),
            other => match NaiveDate::parse_from_str(other, "%Y-%m-%d") {
                Ok(date) => return Ok(Some(date)),
                Err(_) => println!("Sagutin ng 'r', petsa (YYYY-MM-DD), o 'n'."),
            },
        }
    }
}
