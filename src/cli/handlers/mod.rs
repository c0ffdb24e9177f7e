use std::error::Error;
use std::io::Read;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::gesture::replay::{ReplayInput, replay};
use crate::io::config_io;
use crate::io::session::{Saved, Session};
use crate::io::storage::FileStore;
use crate::model::config::Config;
use crate::model::list::ListId;
use crate::model::store::TaskStore;
use crate::model::task::{CategoryFlags, Flag, TaskId};
use crate::ops::search;
use crate::ops::view::{Filter, Section};

type CmdResult = Result<(), Box<dyn Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, config: &Config) -> CmdResult {
    let json = cli.json;

    // Commands that never touch stored data
    match cli.command {
        Commands::Themes => return cmd_themes(json),
        Commands::Gesture(args) => return cmd_gesture(args, config, json),
        _ => {}
    }

    let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref(), config)?;
    tracing::debug!(data_dir = %data_dir.display(), "opening session");
    let mut session = Session::open(FileStore::new(data_dir)).with_undo(config.tasks.undo_delete);
    if let Some(e) = session.load_error() {
        eprintln!("warning: could not load saved data, starting empty: {}", e);
    }

    match cli.command {
        // Read commands
        Commands::List(args) => cmd_list(&session, args, json),
        Commands::Show(args) => cmd_show(&session, args, json),
        Commands::Search(args) => cmd_search(&session, args, json),
        Commands::Counts => cmd_counts(&session, json),
        Commands::Lists => cmd_lists(&session, json),

        // Task writes
        Commands::Add(args) => cmd_add(&mut session, args, json),
        Commands::Done(args) => {
            let saved = session.toggle_completed(TaskId(args.id))?;
            print_task(&session, saved, json)
        }
        Commands::Flag(args) => {
            let flag: Flag = args.flag.parse()?;
            let saved = session.toggle_flag(TaskId(args.id), flag)?;
            print_task(&session, saved, json)
        }
        Commands::Edit(args) => {
            let saved = session.edit_text(TaskId(args.id), &args.text.join(" "))?;
            print_task(&session, saved, json)
        }
        Commands::Rm(args) => cmd_rm(&mut session, args, json),
        Commands::Undo => cmd_undo(&mut session, json),
        Commands::Mv(args) => cmd_mv(&mut session, args, json),
        Commands::Attach(args) => {
            let list_id = args
                .list
                .as_deref()
                .map(|name| resolve_list(session.store(), name))
                .transpose()?;
            let saved = session.move_task_to_list(TaskId(args.id), list_id)?;
            print_task(&session, saved, json)
        }

        // List writes
        Commands::ListNew(args) => {
            let saved = session.create_list(&args.name, &args.theme)?;
            warn_unsaved(&saved);
            print_list(&session, &saved.value, json)
        }
        Commands::ListRename(args) => {
            let id = resolve_list(session.store(), &args.name)?;
            let saved = session.rename_list(id, &args.new_name)?;
            warn_unsaved(&saved);
            print_list(&session, &saved.value, json)
        }
        Commands::ListTheme(args) => {
            let id = resolve_list(session.store(), &args.name)?;
            let saved = session.set_list_theme(id, &args.theme)?;
            warn_unsaved(&saved);
            print_list(&session, &saved.value, json)
        }
        Commands::ListRm(args) => cmd_list_rm(&mut session, args, json),

        // Handled before opening the session
        Commands::Themes | Commands::Gesture(_) => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_list(store: &TaskStore, name: &str) -> Result<ListId, Box<dyn Error>> {
    store
        .list_by_name(name)
        .map(|l| l.id)
        .ok_or_else(|| format!("no list named '{}'", name).into())
}

/// The section a `list`/`mv` invocation refers to
fn resolve_section(
    store: &TaskStore,
    section: &str,
    list: Option<&str>,
) -> Result<Section, Box<dyn Error>> {
    match list {
        Some(name) => Ok(Section::List(resolve_list(store, name)?)),
        None => Ok(section.parse::<Section>()?),
    }
}

fn section_title(store: &TaskStore, section: Section) -> String {
    match section {
        Section::List(id) => store
            .list(id)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| section.key()),
        other => other.title().to_string(),
    }
}

fn warn_unsaved<T>(saved: &Saved<T>) {
    if let Some(e) = &saved.persist_error {
        eprintln!("warning: changes may not survive a reload: {}", e);
    }
}

fn print_task(
    session: &Session<FileStore>,
    saved: Saved<crate::model::task::Task>,
    json: bool,
) -> CmdResult {
    warn_unsaved(&saved);
    let store = session.store();
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(&saved.value, store))?);
    } else {
        println!("{}", format_task_line(&saved.value, store, term_width()));
    }
    Ok(())
}

fn print_list(
    session: &Session<FileStore>,
    list: &crate::model::list::CustomList,
    json: bool,
) -> CmdResult {
    let store = session.store();
    if json {
        println!("{}", serde_json::to_string_pretty(&list_to_json(list, store))?);
    } else {
        println!("{}", format_list_line(list, store).trim_start());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(session: &Session<FileStore>, args: ListArgs, json: bool) -> CmdResult {
    let store = session.store();
    let default_section = if args.grouped { "tasks" } else { "my-day" };
    let section_name = args.section.as_deref().unwrap_or(default_section);
    let section = resolve_section(store, section_name, args.list.as_deref())?;
    if args.grouped && section != Section::All {
        return Err(format!(
            "--grouped only applies to the tasks section, not {}",
            section.key()
        )
        .into());
    }

    if args.grouped {
        let groups = store.all_tasks_groups();
        if json {
            let out = GroupsJson {
                my_day: tasks_to_json(&groups.my_day, store),
                important: tasks_to_json(&groups.important, store),
                completed: tasks_to_json(&groups.completed, store),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            let width = term_width();
            let blocks = [
                ("My Day", &groups.my_day),
                ("Important", &groups.important),
                ("Completed", &groups.completed),
            ];
            for (i, (title, tasks)) in blocks.into_iter().enumerate() {
                if i > 0 {
                    println!();
                }
                for line in format_view(title, tasks, store, width) {
                    println!("{}", line);
                }
            }
        }
        return Ok(());
    }

    let tasks = store.view(&Filter::Section(section));
    let title = section_title(store, section);
    if json {
        let out = SectionJson {
            section: section.key(),
            title,
            tasks: tasks_to_json(&tasks, store),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_view(&title, &tasks, store, term_width()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_show(session: &Session<FileStore>, args: IdArg, json: bool) -> CmdResult {
    let store = session.store();
    let task = store
        .task(TaskId(args.id))
        .ok_or_else(|| format!("task not found: {}", args.id))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task, store))?);
    } else {
        for line in format_task_detail(task, store) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_search(session: &Session<FileStore>, args: SearchArgs, json: bool) -> CmdResult {
    let store = session.store();
    let hits = search::search_tasks(store, &args.query);
    if json {
        let out: Vec<SearchHitJson> = hits
            .iter()
            .filter_map(|hit| store.task(hit.task_id).map(|t| hit_to_json(hit, t)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for hit in &hits {
            if let Some(task) = store.task(hit.task_id) {
                let check = if task.completed { 'x' } else { ' ' };
                println!(
                    "[{}] {} {}",
                    check,
                    task.id,
                    highlight_spans(&task.text, &hit.spans)
                );
            }
        }
    }
    Ok(())
}

fn cmd_counts(session: &Session<FileStore>, json: bool) -> CmdResult {
    let store = session.store();
    let counts = store.counts();
    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        for count in &counts {
            let title = match count.key.parse::<Section>() {
                Ok(section) => section_title(store, section),
                Err(_) => count.key.clone(),
            };
            println!("{}", format_count_line(&title, count.count));
        }
    }
    Ok(())
}

fn cmd_lists(session: &Session<FileStore>, json: bool) -> CmdResult {
    let store = session.store();
    if json {
        let out: Vec<ListJson> = store.lists().iter().map(|l| list_to_json(l, store)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for list in store.lists() {
            println!("{}", format_list_line(list, store));
        }
    }
    Ok(())
}

fn cmd_themes(json: bool) -> CmdResult {
    let registry = crate::model::theme::ThemeRegistry::default();
    if json {
        let out: Vec<ThemeJson> = registry
            .iter()
            .map(|(key, theme)| ThemeJson {
                key,
                theme: theme.clone(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (key, theme) in registry.iter() {
            println!("{}", format_theme_line(key, theme));
        }
    }
    Ok(())
}

fn cmd_gesture(args: GestureArgs, config: &Config, json: bool) -> CmdResult {
    let raw = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let input: ReplayInput = serde_json::from_str(&raw)?;
    let action = replay(&config.gesture, &input);
    if json {
        println!("{}", serde_json::to_string_pretty(&action_to_json(action))?);
    } else {
        println!("{}", format_action(action));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(session: &mut Session<FileStore>, args: AddArgs, json: bool) -> CmdResult {
    let list_id = args
        .list
        .as_deref()
        .map(|name| resolve_list(session.store(), name))
        .transpose()?;
    let mut flags = CategoryFlags {
        important: args.important,
        my_day: args.my_day,
        planned: args.planned,
        assigned: args.assigned,
    };
    // Added from the default My Day page
    if flags == CategoryFlags::default() && list_id.is_none() {
        flags = CategoryFlags::my_day();
    }
    let saved = session.create_task(&args.text.join(" "), flags, list_id)?;
    print_task(session, saved, json)
}

fn cmd_rm(session: &mut Session<FileStore>, args: IdArg, json: bool) -> CmdResult {
    let saved = session.delete_task(TaskId(args.id))?;
    warn_unsaved(&saved);
    let removed = saved.value;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&task_to_json(&removed.task, session.store()))?
        );
    } else if session.last_deleted().is_some() {
        println!("deleted {} \"{}\" (undo with `myday undo`)", removed.task.id, removed.task.text);
    } else {
        println!("deleted {} \"{}\"", removed.task.id, removed.task.text);
    }
    Ok(())
}

fn cmd_undo(session: &mut Session<FileStore>, json: bool) -> CmdResult {
    match session.undo_delete()? {
        Some(saved) => print_task(session, saved, json),
        None => Err("nothing to undo".into()),
    }
}

fn cmd_mv(session: &mut Session<FileStore>, args: MvArgs, json: bool) -> CmdResult {
    if args.from == 0 || args.to == 0 {
        return Err("positions start at 1".into());
    }
    let section = resolve_section(session.store(), &args.section, args.list.as_deref())?;
    let filter = Filter::Section(section);
    let saved = session.reorder_in_view(&filter, args.from - 1, args.to - 1)?;
    warn_unsaved(&saved);

    let store = session.store();
    let tasks = store.view(&filter);
    if json {
        println!("{}", serde_json::to_string_pretty(&tasks_to_json(&tasks, store))?);
    } else {
        for line in format_view(&section_title(store, section), &tasks, store, term_width()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_list_rm(session: &mut Session<FileStore>, args: ListNameArg, json: bool) -> CmdResult {
    let id = resolve_list(session.store(), &args.name)?;
    let saved = session.delete_list(id)?;
    warn_unsaved(&saved);
    let removed = saved.value;
    if json {
        let out = RemovedListJson {
            list: ListJson {
                id: removed.list.id.0,
                name: removed.list.name.clone(),
                theme: removed.list.theme.clone(),
                count: 0,
            },
            removed_tasks: removed.tasks.len(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "deleted list \"{}\" and {} task(s)",
            removed.list.name,
            removed.tasks.len()
        );
    }
    Ok(())
}
