mod user;
pub use user::{User, UserCreate, validate_username};

mod video;
pub use video::{Video, VideoCreate};

mod course;
pub use course::{Course, CourseCreate, CourseStatus};

mod course_professor;
pub use course_professor::{CourseProfessor, CourseProfessorCreate, ProfessorRole};

mod course_student;
pub use course_student::{CourseStudent, percent_progress};

mod lesson;
pub use lesson::{Lesson, LessonCreate, activity_count, unit_count, video_count};

mod unit;
pub use unit::{Unit, UnitCreate};

mod activity;
pub use activity::{Activity, ActivityCreate, ActivityPayload, ChoiceQuestion};

mod answer;
pub use answer::{Answer, AnswerCreate};

mod student_progress;
pub use student_progress::StudentProgress;
