use anyhow::Result;
use serde_json::json;
use pidkeeper::{pid_dir, ProcessSupervisor, PATH_SEPARATOR};

pub fn execute(supervisor: &ProcessSupervisor, json_output: bool) -> Result<()> {
    let platform = supervisor.platform();

    if json_output {
        let info = json!({
            "platform": platform,
            "resource_dir": platform.resource_dir(),
            "path_separator": PATH_SEPARATOR.to_string(),
            "pid_dir": pid_dir(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Platform: {}", platform);
        println!("Resource directory: {}", platform.resource_dir());
        println!("Path separator: {}", PATH_SEPARATOR);
        println!("Pid directory: {}", pid_dir().display());
    }

    Ok(())
}
