//! Localized user-facing texts (Ukrainian).

// Projects
pub const PROJECT_CREATED: &str = "Проєкт створено";
pub const PROJECT_UPDATED: &str = "Проєкт оновлено";
pub const PROJECT_DELETED: &str = "Проєкт видалено";
pub const PROJECT_SAVE_FAILED: &str = "Сталася помилка при створенні";
pub const PROJECT_UPDATE_FAILED: &str = "Не вдалось оновити проєкт";

// Tasks
pub const TASK_CREATED: &str = "Задача створена";
pub const TASK_UPDATED: &str = "Задача оновлена";
pub const TASKS_LOAD_FAILED: &str = "Не вдалось завантажити задачі";
pub const TASK_LOAD_FAILED: &str = "Не вдалось завантажити задачу";
pub const TASK_CREATE_FAILED: &str = "Не вдалось створити задачу";
pub const TASK_UPDATE_FAILED: &str = "Не вдалось оновити задачу";

// Validation
pub const PROJECT_NAME_NEEDS_LETTER: &str = "Назва не може складатися лише з цифр";
pub const TASK_NAME_TOO_SHORT: &str = "Мінімум 3 символи";
pub const TASK_NAME_TOO_LONG: &str = "Максимум 120 символів";
pub const TASK_STATUS_INVALID: &str = "Невідомий статус";
pub const TASK_DEADLINE_INVALID: &str = "Невірна дата";
pub const TASK_DEADLINE_IN_PAST: &str =
    "Термін виконання не може бути раніше сьогоднішнього дня.";
