use std::sync::Arc;

use knowledge_check::config::Config;
use knowledge_check::quiz::accordion::Accordion;
use knowledge_check::quiz::inline_check::InlineCheck;
use knowledge_check::quiz::run::{Advance, QuizRun};
use knowledge_check::render::{self, CheckReply, FaqReply, QuizReply, Screen};
use knowledge_check::section::{Library, Section};
use log::{debug, info, warn};
use teloxide::{
    dispatching::{dialogue::InMemStorage, UpdateHandler},
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup, ParseMode},
};

type QuizDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Where a chat is within a section. Kept in memory only.
#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    ReceiveSectionChoice,
    InlineCheck {
        section: String,
        position: usize,
        check: InlineCheck,
    },
    Faq {
        section: String,
        accordion: Accordion,
    },
    Quiz {
        section: String,
        run: QuizRun,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    pretty_env_logger::init();
    info!("Starting knowledge check bot...");

    let library = Arc::new(Library::load_dir(&config.content_dir)?);
    info!("Serving {} sections", library.len());

    let bot = Bot::new(config.token);

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![InMemStorage::<State>::new(), library])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    Ok(())
}

fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<State>, State>()
        .branch(dptree::filter(|msg: Message| is_menu_request(&msg)).endpoint(start))
        .branch(dptree::case![State::Start].endpoint(start))
        .branch(dptree::case![State::ReceiveSectionChoice].endpoint(receive_section_choice))
        .branch(
            dptree::case![State::InlineCheck {
                section,
                position,
                check
            }]
            .endpoint(inline_check),
        )
        .branch(dptree::case![State::Faq { section, accordion }].endpoint(faq))
        .branch(dptree::case![State::Quiz { section, run }].endpoint(quiz))
}

fn is_menu_request(msg: &Message) -> bool {
    matches!(msg.text().map(str::trim), Some("/start") | Some(render::BACK_TO_SECTIONS))
}

async fn send_screen(bot: &Bot, chat: ChatId, screen: Screen) -> HandlerResult {
    let request = bot.send_message(chat, screen.text).parse_mode(ParseMode::Html);
    if screen.buttons.is_empty() {
        request.await?;
    } else {
        let keyboard = KeyboardMarkup::new(
            screen
                .buttons
                .into_iter()
                .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>()),
        );
        request.reply_markup(keyboard).await?;
    }
    Ok(())
}

const PICK_AN_OPTION: &str = "Please pick one of the options below.";

async fn ask_to_pick(bot: &Bot, msg: &Message) -> HandlerResult {
    warn!(
        "chat {}: unrecognised reply {:?}",
        msg.chat.id,
        msg.text().unwrap_or_default()
    );
    bot.send_message(msg.chat.id, PICK_AN_OPTION).await?;
    Ok(())
}

async fn start(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    library: Arc<Library>,
) -> HandlerResult {
    send_screen(&bot, msg.chat.id, render::section_menu(&library)).await?;
    dialogue.update(State::ReceiveSectionChoice).await?;
    Ok(())
}

async fn receive_section_choice(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    library: Arc<Library>,
) -> HandlerResult {
    let Some(section) = msg.text().and_then(|title| library.find_by_title(title)) else {
        return ask_to_pick(&bot, &msg).await;
    };
    info!("chat {}: opened section {}", msg.chat.id, section.id);

    send_screen(&bot, msg.chat.id, render::section_intro(section)).await?;
    begin_checks(&bot, &dialogue, msg.chat.id, section, 0).await
}

/// Presents the inline check at `position`, or moves on to the FAQ once
/// every check has been shown.
async fn begin_checks(
    bot: &Bot,
    dialogue: &QuizDialogue,
    chat: ChatId,
    section: &Section,
    position: usize,
) -> HandlerResult {
    let Some(check) = section.inline_check(position) else {
        return begin_faq(bot, dialogue, chat, section).await;
    };
    let screen = render::inline_check(&check, position, section.inline_checks.len());
    send_screen(bot, chat, screen).await?;
    dialogue
        .update(State::InlineCheck {
            section: section.id.clone(),
            position,
            check,
        })
        .await?;
    Ok(())
}

async fn begin_faq(
    bot: &Bot,
    dialogue: &QuizDialogue,
    chat: ChatId,
    section: &Section,
) -> HandlerResult {
    if section.faqs.is_empty() {
        return begin_quiz(bot, dialogue, chat, section).await;
    }
    let accordion = Accordion::new(section.faqs.len());
    send_screen(bot, chat, render::faq(section, &accordion)).await?;
    dialogue
        .update(State::Faq {
            section: section.id.clone(),
            accordion,
        })
        .await?;
    Ok(())
}

async fn begin_quiz(
    bot: &Bot,
    dialogue: &QuizDialogue,
    chat: ChatId,
    section: &Section,
) -> HandlerResult {
    let run = section.start_quiz();
    send_screen(bot, chat, render::quiz_run(&run)).await?;
    dialogue
        .update(State::Quiz {
            section: section.id.clone(),
            run,
        })
        .await?;
    Ok(())
}

/// A dialogue named a section the library doesn't have. Back to the menu.
async fn section_gone(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    library: Arc<Library>,
    id: &str,
) -> HandlerResult {
    warn!("chat {}: section {} is no longer available", msg.chat.id, id);
    start(bot, dialogue, msg, library).await
}

async fn inline_check(
    bot: Bot,
    dialogue: QuizDialogue,
    (section_id, position, mut check): (String, usize, InlineCheck),
    msg: Message,
    library: Arc<Library>,
) -> HandlerResult {
    let Some(section) = library.get(&section_id) else {
        return section_gone(bot, dialogue, msg, library.clone(), &section_id).await;
    };
    match render::apply_check_reply(&mut check, msg.text().unwrap_or_default()) {
        CheckReply::Continue => {
            return begin_checks(&bot, &dialogue, msg.chat.id, section, position + 1).await;
        }
        CheckReply::Unrecognised => return ask_to_pick(&bot, &msg).await,
        CheckReply::Answered(correct) => debug!(
            "chat {}: answered check {} of {} ({})",
            msg.chat.id,
            position + 1,
            section.id,
            if correct { "correct" } else { "incorrect" }
        ),
    }

    let screen = render::inline_check(&check, position, section.inline_checks.len());
    send_screen(&bot, msg.chat.id, screen).await?;
    dialogue
        .update(State::InlineCheck {
            section: section_id,
            position,
            check,
        })
        .await?;
    Ok(())
}

async fn faq(
    bot: Bot,
    dialogue: QuizDialogue,
    (section_id, mut accordion): (String, Accordion),
    msg: Message,
    library: Arc<Library>,
) -> HandlerResult {
    let Some(section) = library.get(&section_id) else {
        return section_gone(bot, dialogue, msg, library.clone(), &section_id).await;
    };
    match render::apply_faq_reply(&mut accordion, section, msg.text().unwrap_or_default()) {
        FaqReply::StartQuiz => return begin_quiz(&bot, &dialogue, msg.chat.id, section).await,
        FaqReply::Unrecognised => return ask_to_pick(&bot, &msg).await,
        FaqReply::Toggled(_) => {}
    }
    send_screen(&bot, msg.chat.id, render::faq(section, &accordion)).await?;
    dialogue
        .update(State::Faq {
            section: section_id,
            accordion,
        })
        .await?;
    Ok(())
}

async fn quiz(
    bot: Bot,
    dialogue: QuizDialogue,
    (section_id, mut run): (String, QuizRun),
    msg: Message,
    library: Arc<Library>,
) -> HandlerResult {
    if library.get(&section_id).is_none() {
        return section_gone(bot, dialogue, msg, library.clone(), &section_id).await;
    }
    match render::apply_quiz_reply(&mut run, msg.text().unwrap_or_default()) {
        Some(QuizReply::Advanced(Advance::Completed(summary))) => info!(
            "chat {}: finished {} with {}/{} ({}%)",
            msg.chat.id, section_id, summary.score, summary.total, summary.percentage
        ),
        Some(_) => {}
        None => return ask_to_pick(&bot, &msg).await,
    }

    send_screen(&bot, msg.chat.id, render::quiz_run(&run)).await?;
    dialogue
        .update(State::Quiz {
            section: section_id,
            run,
        })
        .await?;
    Ok(())
}
