use unsegen::input::*;

use nom::{
    character::complete::*,
    combinator::*,
    error::{ErrorKind as NomErrorKind, ParseError},
    sequence::{separated_pair, tuple},
    Err, IResult,
};

use super::context::{Context, Mode};
use crate::error::{Error, ErrorKind, Result};

pub struct CommandParser<'a> {
    context: &'a mut Context,
}

pub fn match_action<'a, 's, T: ?Sized, Act: 's>(
    c: &'a T,
) -> impl Fn(&str) -> IResult<&str, (&'s str, &'s Act)> + 'a
where
    &'a T: IntoIterator<Item = &'s (&'s str, Act)>,
{
    move |input| {
        if let Some((name, act)) = c.into_iter().find(|(name, _)| name == &input) {
            Ok(("", (name, act)))
        } else {
            Err(Err::Failure(ParseError::from_error_kind(
                input,
                NomErrorKind::Tag,
            )))
        }
    }
}

fn unknown_command(cmd: &str) -> Error {
    Error::new(
        ErrorKind::MalformedInput,
        &format!("Not a command: {}", cmd),
    )
}

impl<'a> CommandParser<'a> {
    pub fn new(context: &'a mut Context) -> Self {
        CommandParser { context }
    }

    pub fn run_command(&mut self, cmd: &str) -> Result<()> {
        let cmd = cmd.trim();

        let res = all_consuming(tuple((digit1, match_action(COMMANDS))))(cmd);

        if let Ok((_, (repeat, (_, act)))) = res {
            let repeats = repeat.parse::<u32>().map_err(|_| {
                Error::new(
                    ErrorKind::MalformedInput,
                    &format!("Invalid repeat count: {}", repeat),
                )
            })?;

            return match act {
                Action::Repeatable(a) => a(self.context, repeats),
                _ => Err(unknown_command(cmd)),
            };
        };

        let res = all_consuming(separated_pair(match_action(COMMANDS), space1, rest))(cmd);

        if let Ok((_, ((_, act), arg))) = res {
            return match act {
                Action::Arg(a) => a(self.context, arg.to_owned()),
                _ => Err(unknown_command(cmd)),
            };
        };

        let (_, (_, act)) =
            all_consuming(match_action(COMMANDS))(cmd).map_err(|_| unknown_command(cmd))?;

        match act {
            Action::NoArg(a) => a(self.context),
            Action::Repeatable(a) => a(self.context, 1),
            Action::Arg(_) => Err(Error::new(
                ErrorKind::MalformedInput,
                &format!("'{}' needs an argument", cmd),
            )),
        }
    }

    fn report_error(&mut self, error: Error) {
        log::info!("Command failed: {}", error);
        self.context
            .controller_mut()
            .set_alert(error.user_message());
    }
}

impl Behavior for CommandParser<'_> {
    fn input(mut self, input: Input) -> Option<Input> {
        if input.matches(Key::Char('\n')) {
            let cmd = self
                .context
                .input_sink_mut(Mode::Command)
                .finish_line()
                .to_owned();
            self.context.mode = Mode::Normal;
            if let Err(e) = self.run_command(&cmd) {
                self.report_error(e);
            }
            self.context.clamp_cursor();
            None
        } else {
            Some(input)
        }
    }
}

pub type ActionResult = Result<()>;

pub enum Action {
    Arg(fn(&mut Context, String) -> ActionResult),
    NoArg(fn(&mut Context) -> ActionResult),
    Repeatable(fn(&mut Context, u32) -> ActionResult),
}

const COMMANDS: &[(&'static str, Action)] = &[
    (
        "n",
        Action::Repeatable(|c, p| c.controller_mut().show_months_ahead(p)),
    ),
    (
        "p",
        Action::Repeatable(|c, p| c.controller_mut().show_months_back(p)),
    ),
    (
        "today",
        Action::NoArg(|c| {
            c.controller_mut().show_initial();
            let initial = c.controller().view().initial_date();
            c.cursor_to(&initial);
            Ok(())
        }),
    ),
    (
        "set",
        Action::Arg(|c, text| {
            let date = c.controller_mut().submit_active_date(&text, "")?;
            c.cursor_to(&date);
            Ok(())
        }),
    ),
    (
        "q",
        Action::NoArg(|c| {
            c.quit = true;
            Ok(())
        }),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CalendarDate, MonthIndex};
    use crate::control::Controller;
    use crate::surface::Surface;
    use crate::view::{Classes, View};
    use chrono::Month;

    fn context() -> Context {
        let initial = CalendarDate::from_ymd(2024, 1, 15).unwrap();
        let view = View::new(initial, Surface::calendar(), Classes::default()).unwrap();
        Context::new(Controller::new(view))
    }

    #[test]
    fn repeat_prefix() {
        let mut c = context();
        CommandParser::new(&mut c).run_command("3n").unwrap();
        assert_eq!(
            c.controller().displayed(),
            MonthIndex::new(Month::April, 2024)
        );

        CommandParser::new(&mut c).run_command("p").unwrap();
        assert_eq!(
            c.controller().displayed(),
            MonthIndex::new(Month::March, 2024)
        );

        CommandParser::new(&mut c).run_command("today").unwrap();
        assert_eq!(
            c.controller().displayed(),
            MonthIndex::new(Month::January, 2024)
        );
    }

    #[test]
    fn set_activates_date() {
        let mut c = context();
        CommandParser::new(&mut c)
            .run_command("set 2024-06-03")
            .unwrap();
        let date = CalendarDate::from_ymd(2024, 6, 3).unwrap();
        assert_eq!(c.controller().view().active_date(), Some(date));
        assert_eq!(c.controller().view().find_day_cell(&date), Some(c.cursor));
    }

    #[test]
    fn bad_commands_are_errors() {
        let mut c = context();
        assert!(CommandParser::new(&mut c).run_command("frobnicate").is_err());
        assert!(CommandParser::new(&mut c).run_command("set").is_err());
        assert!(CommandParser::new(&mut c).run_command("2today").is_err());
        assert!(CommandParser::new(&mut c).run_command("set 2024-13-01").is_err());
        assert_eq!(c.controller().view().active_date(), None);
    }

    #[test]
    fn oversized_repeat_counts_are_rejected() {
        let mut c = context();
        assert!(CommandParser::new(&mut c).run_command("3200000n").is_err());
        assert!(CommandParser::new(&mut c).run_command("4294967295n").is_err());
        assert!(CommandParser::new(&mut c).run_command("99999999999p").is_err());
        assert_eq!(
            c.controller().displayed(),
            MonthIndex::new(Month::January, 2024)
        );

        CommandParser::new(&mut c).run_command("24000p").unwrap();
        assert_eq!(
            c.controller().displayed(),
            MonthIndex::new(Month::January, 24)
        );
    }

    #[test]
    fn quit_sets_flag() {
        let mut c = context();
        CommandParser::new(&mut c).run_command("q").unwrap();
        assert!(c.quit);
    }
}
