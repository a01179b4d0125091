use std::path::Path;

use crate::app::App;
use crate::config::Config;
use crate::settings::Settings;

pub const TEST_CONFIG: &str = r#"
fields:
  - - name: id
      caption: ID
      type: number
      read_only: true
      input_width: 6
    - name: title
      caption: Title
      type: string
      table_column_width: 0
    - name: state
      caption: State
      type: select
      options: [open, closed]
      table_column_width: 8
  - - name: created
      caption: Created
      type: date
      read_only: true
      computed: created_date
      table_column_width: 10
    - name: edited
      caption: Edited
      type: date
      read_only: true
      computed: edit_date
  - - name: body
      caption: Notes
      type: string
      lines: 4
task_columns:
  - name: todo
    caption: To do
  - name: doing
    caption: In progress
  - name: done
    caption: Done
"#;

/// App over an empty data folder with the test config.
pub fn test_app(data_folder: &Path) -> App {
    let config = Config::from_yaml(TEST_CONFIG, &data_folder.join("config.yaml")).unwrap();
    App::new(config, Settings::default(), data_folder).unwrap()
}
