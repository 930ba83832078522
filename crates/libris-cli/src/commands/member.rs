//! Member command handlers

use anyhow::{anyhow, Context, Result};

use libris_core::{Member, Store, Transaction};

use crate::output::Output;
use crate::prompt::{confirm, prompt_with_default};

/// Register a new member
pub fn add(
    store: &mut Store,
    id: String,
    name: String,
    address: String,
    phone: String,
    output: &Output,
) -> Result<()> {
    let member = Member::new(id, name, address, phone);
    store
        .add_member(member.clone())
        .context("Failed to add member")?;

    output.success(&format!("Added member: {}", member.id));
    output.print_member(&member, &[]);

    Ok(())
}

/// Edit a member's name, address and phone
pub fn edit(
    store: &mut Store,
    id: String,
    name: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut member = store
        .find_member(&id)
        .cloned()
        .ok_or_else(|| anyhow!("Member not found: {}", id))?;

    if name.is_none() && address.is_none() && phone.is_none() && output.should_prompt() {
        println!("Editing member: {}", member.id);
        println!("Press Enter to keep current value, or type new value.\n");

        if let Some(new_name) = prompt_with_default("Name", &member.name)? {
            member.name = new_name;
        }
        if let Some(new_address) = prompt_with_default("Address", &member.address)? {
            member.address = new_address;
        }
        if let Some(new_phone) = prompt_with_default("Phone", &member.phone)? {
            member.phone = new_phone;
        }
    } else {
        if let Some(name) = name {
            member.name = name;
        }
        if let Some(address) = address {
            member.address = address;
        }
        if let Some(phone) = phone {
            member.phone = phone;
        }
    }

    store
        .edit_member(&id, &member)
        .context("Failed to update member")?;

    output.success("Member updated");
    output.print_member(&member, &open_loans(store, &id));

    Ok(())
}

/// Delete a member
pub fn delete(store: &mut Store, id: String, yes: bool, output: &Output) -> Result<()> {
    let member = store
        .find_member(&id)
        .ok_or_else(|| anyhow!("Member not found: {}", id))?;

    if output.should_prompt() && !yes {
        println!("Delete member: {} - {}", member.id, member.name);
        let loans = open_loans(store, &id).len();
        if loans > 0 {
            println!("This member still holds {} book(s).", loans);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete_member(&id).context("Failed to delete member")?;

    output.success(&format!("Deleted member: {}", id));

    Ok(())
}

/// List all members
pub fn list(store: &Store, output: &Output) -> Result<()> {
    output.print_members(&store.list_all_members());
    Ok(())
}

/// Search members by id or name
pub fn search(store: &Store, query: String, output: &Output) -> Result<()> {
    output.print_members(&store.search_members(&query));
    Ok(())
}

/// Show a member with the books they hold
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let member = store
        .find_member(&id)
        .ok_or_else(|| anyhow!("Member not found: {}", id))?;

    output.print_member(member, &open_loans(store, &id));
    Ok(())
}

fn open_loans<'a>(store: &'a Store, member_id: &str) -> Vec<&'a Transaction> {
    store
        .transactions()
        .iter()
        .filter(|txn| txn.is_open() && txn.member_id == member_id)
        .collect()
}
