use crate::app::Tab;

/// Commands bound to single keys outside text inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    ShowHelp,
    SwitchTab(Tab),
    NextTab,
    PrevTab,

    // ===== Tasks =====
    TaskUp,
    TaskDown,
    ColumnLeft,
    ColumnRight,
    MoveTaskLeft,
    MoveTaskRight,
    NewTask,
    EditTask,
    DeleteTask,
    /// Copy the description to the clipboard
    CopyTask,

    // ===== Topics =====
    TopicUp,
    TopicDown,
    NewTopic,
    /// Focus the form of the selected topic
    EditTopic,
    DeleteTopic,
    SaveTopic,
    DiscardTopic,

    // ===== Notes =====
    CycleNotesView,
    EditNotes,
    ScrollNotesUp,
    ScrollNotesDown,
}
