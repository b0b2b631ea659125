#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    PrevMonth,
    NextMonth,
    Left,
    Right,
    Up,
    Down,
    Select,
    Today,
    Form,
    Command,
    Exit,
}
