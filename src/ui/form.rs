use unsegen::input::*;

use super::context::{Context, Field, Mode};

/// Handles the keys of the active-date form that are not plain editing:
/// Tab switches between the fields, Enter submits both.
pub struct FormSubmitter<'a> {
    context: &'a mut Context,
}

impl<'a> FormSubmitter<'a> {
    pub fn new(context: &'a mut Context) -> Self {
        FormSubmitter { context }
    }

    fn submit(&mut self) {
        let (date_text, class_text) = self.context.finish_form();
        self.context.mode = Mode::Normal;

        if self
            .context
            .controller_mut()
            .on_submit(&date_text, &class_text)
        {
            if let Some(date) = self.context.controller().view().active_date() {
                self.context.cursor_to(&date);
            }
        }
        self.context.clamp_cursor();
    }
}

impl Behavior for FormSubmitter<'_> {
    fn input(mut self, input: Input) -> Option<Input> {
        if input.matches(Key::Char('\n')) {
            self.submit();
            None
        } else if input.matches(Key::Char('\t')) {
            self.context.mode = match self.context.mode {
                Mode::Form(Field::Date) => Mode::Form(Field::Class),
                _ => Mode::Form(Field::Date),
            };
            None
        } else {
            Some(input)
        }
    }
}
