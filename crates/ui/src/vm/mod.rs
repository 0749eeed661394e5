mod account_vm;
mod feedback_vm;
mod quiz_vm;
mod record_vm;
mod result_vm;
mod start_vm;
mod time_fmt;

pub use account_vm::{AccountFormVm, account_label};
pub use feedback_vm::{FeedbackRowVm, map_feedback_rows};
pub use quiz_vm::{
    OptionState, OptionVm, PlayOutcome, QuizVm, SavedQuiz, save_finished, start_pending_quiz,
    start_quiz,
};
pub use record_vm::{RecordCardVm, map_record_cards};
pub use result_vm::{FeedbackFormVm, HistoryRowVm, ResultVm};
pub use start_vm::StartFormVm;
pub use time_fmt::{format_countdown, format_datetime};
