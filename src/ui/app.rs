use crate::cmds::Cmd;
use crate::config::{Config, KeyMap};
use crate::control::Controller;
use crate::events::{Dispatcher, Event};

use super::{Context, Field, FormSubmitter, Mode, MonthPane, StatusLine};

use unsegen::base::Terminal;
use unsegen::input::{EditBehavior, Input, Key, ScrollBehavior};
use unsegen::widget::*;

use super::command::CommandParser;

pub struct App {
    key_map: KeyMap,
    context: Context,
}

impl App {
    pub fn new(config: &Config, controller: Controller) -> App {
        App {
            key_map: config.key_map(),
            context: Context::new(controller),
        }
    }

    fn bottom_bar<'w>(&'w self) -> impl Widget + 'w {
        let mut layout = HLayout::new();

        match self.context.mode {
            Mode::Form(_) => {
                layout = layout
                    .widget(self.context.input_sink(Mode::Form(Field::Date)).as_widget())
                    .widget(self.context.input_sink(Mode::Form(Field::Class)).as_widget());
            }
            mode @ Mode::Command => {
                layout = layout.widget(self.context.input_sink(mode).as_widget());
            }
            Mode::Normal => {
                if let Some(alert) = self.context.controller().alert() {
                    layout = layout.widget(StatusLine::new(alert, self.context.theme.alert_style));
                }
            }
        }

        layout
    }

    fn as_widget<'w>(&'w self) -> impl Widget + 'w {
        VLayout::new()
            .widget(MonthPane::new(&self.context))
            .widget(self.bottom_bar())
    }

    fn handle_cmd(&mut self, cmd: Cmd) {
        let context = &mut self.context;

        match cmd {
            Cmd::PrevMonth | Cmd::NextMonth => {
                let controller = context.controller_mut();
                let res = if cmd == Cmd::PrevMonth {
                    controller.show_previous()
                } else {
                    controller.show_next()
                };
                if let Err(e) = res {
                    log::info!("Navigation failed: {}", e);
                    controller.set_alert(e.user_message());
                }
            }
            Cmd::Left => context.move_cursor(-1),
            Cmd::Right => context.move_cursor(1),
            Cmd::Up => context.move_cursor(-(crate::grid::COLUMNS as isize)),
            Cmd::Down => context.move_cursor(crate::grid::COLUMNS as isize),
            Cmd::Select => {
                let cursor = context.cursor;
                if let Some(pos) = context.controller_mut().select_cell(cursor) {
                    context.cursor = pos;
                }
            }
            Cmd::Today => {
                context.controller_mut().show_initial();
                let initial = context.controller().view().initial_date();
                context.cursor_to(&initial);
            }
            Cmd::Form => context.mode = Mode::Form(Field::Date),
            Cmd::Command => context.mode = Mode::Command,
            Cmd::Exit => context.quit = true,
        }

        context.clamp_cursor();
    }

    fn handle_input(&mut self, input: Input) {
        if input.matches(Key::Esc) {
            self.context.mode = Mode::Normal;
            return;
        }

        match self.context.mode {
            Mode::Normal => {
                self.context.controller_mut().take_alert();

                let cmd = match &input.event {
                    unsegen::input::Event::Key(key) => self.key_map.get(key).copied(),
                    _ => None,
                };

                if let Some(cmd) = cmd {
                    log::debug!("Running {:?}", cmd);
                    self.handle_cmd(cmd);
                }
            }
            mode @ Mode::Form(_) => {
                input
                    .chain(FormSubmitter::new(&mut self.context))
                    .chain(
                        EditBehavior::new(self.context.input_sink_mut(mode))
                            .delete_forwards_on(Key::Delete)
                            .delete_backwards_on(Key::Backspace)
                            .left_on(Key::Left)
                            .right_on(Key::Right),
                    )
                    .chain(
                        ScrollBehavior::new(self.context.input_sink_mut(mode))
                            .backwards_on(Key::Up)
                            .forwards_on(Key::Down),
                    )
                    .finish();
            }
            mode @ Mode::Command => {
                input
                    .chain(CommandParser::new(&mut self.context))
                    .chain(
                        EditBehavior::new(self.context.input_sink_mut(mode))
                            .delete_forwards_on(Key::Delete)
                            .delete_backwards_on(Key::Backspace)
                            .left_on(Key::Left)
                            .right_on(Key::Right),
                    )
                    .chain(
                        ScrollBehavior::new(self.context.input_sink_mut(mode))
                            .backwards_on(Key::Up)
                            .forwards_on(Key::Down),
                    )
                    .finish();
            }
        }
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<(), Box<dyn std::error::Error>> {
        while !self.context.quit {
            // Draw
            let root = term.create_root_window();
            self.as_widget().draw(root, RenderingHints::new());
            term.present();

            // Handle events
            match dispatcher.next()? {
                Event::Input(input) => self.handle_input(input),
                Event::Signal(signal) => log::debug!("Redrawing after {:?}", signal),
            }
        }

        Ok(())
    }
}
