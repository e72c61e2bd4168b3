use rusqlite::{params, Connection};

use crate::models::{parse_price, Appointment, AppointmentStatus, Client, Service, Studio};

// ── Services ──

pub fn get_services(conn: &Connection) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, price, description, long_description, duration, maintenance, image
         FROM services ORDER BY rowid ASC",
    )?;

    let rows = stmt.query_map([], |row| Ok(parse_service_row(row)))?;

    let mut services = vec![];
    for row in rows {
        services.push(row??);
    }
    Ok(services)
}

pub fn get_service(conn: &Connection, id: &str) -> anyhow::Result<Option<Service>> {
    let result = conn.query_row(
        "SELECT id, name, price, description, long_description, duration, maintenance, image
         FROM services WHERE id = ?1",
        params![id],
        |row| Ok(parse_service_row(row)),
    );

    match result {
        Ok(service) => Ok(Some(service?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn create_service(conn: &Connection, service: &Service) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO services (id, name, price, description, long_description, duration, maintenance, image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            service.id,
            service.name,
            service.price,
            service.description,
            service.long_description,
            service.duration,
            service.maintenance,
            service.image,
        ],
    )?;
    Ok(())
}

pub fn update_service(conn: &Connection, service: &Service) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE services SET name = ?2, price = ?3, description = ?4, long_description = ?5,
                duration = ?6, maintenance = ?7, image = ?8
         WHERE id = ?1",
        params![
            service.id,
            service.name,
            service.price,
            service.description,
            service.long_description,
            service.duration,
            service.maintenance,
            service.image,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_service(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM services WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_service_row(row: &rusqlite::Row) -> anyhow::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        description: row.get(3)?,
        long_description: row.get(4)?,
        duration: row.get(5)?,
        maintenance: row.get(6)?,
        image: row.get(7)?,
    })
}

// ── Appointments ──
//
// Two views over logically one write: the global ledger and the client's
// personal history. Every mutation below touches both tables; callers
// wrap the call in a transaction so the views can never diverge.

pub fn insert_appointment(conn: &Connection, appointment: &Appointment) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO appointments (id, service_id, service_name, client_name, client_whatsapp,
                date, month, time, status, price)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            appointment.id,
            appointment.service_id,
            appointment.service_name,
            appointment.client_name,
            appointment.client_whatsapp,
            appointment.date,
            appointment.month,
            appointment.time,
            appointment.status.as_str(),
            appointment.price,
        ],
    )?;
    conn.execute(
        "INSERT INTO client_appointments (id, service_id, service_name, client_name, client_whatsapp,
                date, month, time, status, price)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            appointment.id,
            appointment.service_id,
            appointment.service_name,
            appointment.client_name,
            appointment.client_whatsapp,
            appointment.date,
            appointment.month,
            appointment.time,
            appointment.status.as_str(),
            appointment.price,
        ],
    )?;
    Ok(())
}

pub fn delete_appointment(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM appointments WHERE id = ?1", params![id])?;
    conn.execute(
        "DELETE FROM client_appointments WHERE id = ?1",
        params![id],
    )?;
    Ok(count > 0)
}

/// Status changes are transitions, not removals: the row stays in both
/// tables so history is preserved for reporting.
pub fn set_appointment_status(
    conn: &Connection,
    id: &str,
    status: AppointmentStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE appointments SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    conn.execute(
        "UPDATE client_appointments SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

pub fn get_appointment(conn: &Connection, id: &str) -> anyhow::Result<Option<Appointment>> {
    let result = conn.query_row(
        "SELECT id, service_id, service_name, client_name, client_whatsapp,
                date, month, time, status, price
         FROM appointments WHERE id = ?1",
        params![id],
        |row| Ok(parse_appointment_row(row)),
    );

    match result {
        Ok(appointment) => Ok(Some(appointment?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_appointments(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Appointment>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            "SELECT id, service_id, service_name, client_name, client_whatsapp,
                    date, month, time, status, price
             FROM appointments WHERE status = ?1 ORDER BY rowid DESC LIMIT ?2"
                .to_string(),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            "SELECT id, service_id, service_name, client_name, client_whatsapp,
                    date, month, time, status, price
             FROM appointments ORDER BY rowid DESC LIMIT ?1"
                .to_string(),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

/// Non-cancelled appointments occupying a slot. The month is matched by
/// name string: the key carries no year.
pub fn get_appointments_for_slot(
    conn: &Connection,
    date: u32,
    month: &str,
    time: &str,
    service_id: &str,
) -> anyhow::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(
        "SELECT id, service_id, service_name, client_name, client_whatsapp,
                date, month, time, status, price
         FROM appointments
         WHERE date = ?1 AND month = ?2 AND time = ?3 AND service_id = ?4
           AND status != 'cancelled'",
    )?;

    let rows = stmt.query_map(params![date, month, time, service_id], |row| {
        Ok(parse_appointment_row(row))
    })?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

/// The client's personal history, newest first.
pub fn get_client_appointments(
    conn: &Connection,
    whatsapp: &str,
) -> anyhow::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(
        "SELECT id, service_id, service_name, client_name, client_whatsapp,
                date, month, time, status, price
         FROM client_appointments WHERE client_whatsapp = ?1 ORDER BY rowid DESC",
    )?;

    let rows = stmt.query_map(params![whatsapp], |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

fn parse_appointment_row(row: &rusqlite::Row) -> anyhow::Result<Appointment> {
    let status_str: String = row.get(8)?;
    Ok(Appointment {
        id: row.get(0)?,
        service_id: row.get(1)?,
        service_name: row.get(2)?,
        client_name: row.get(3)?,
        client_whatsapp: row.get(4)?,
        date: row.get(5)?,
        month: row.get(6)?,
        time: row.get(7)?,
        status: AppointmentStatus::parse(&status_str),
        price: row.get(9)?,
    })
}

// ── Clients ──

pub fn get_clients(conn: &Connection) -> anyhow::Result<Vec<Client>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, whatsapp, email, total_spent FROM clients ORDER BY name ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Client {
            id: row.get(0)?,
            name: row.get(1)?,
            whatsapp: row.get(2)?,
            email: row.get(3)?,
            total_spent: row.get(4)?,
        })
    })?;

    let mut clients = vec![];
    for row in rows {
        clients.push(row?);
    }
    Ok(clients)
}

pub fn get_client_by_whatsapp(conn: &Connection, whatsapp: &str) -> anyhow::Result<Option<Client>> {
    let result = conn.query_row(
        "SELECT id, name, whatsapp, email, total_spent FROM clients WHERE whatsapp = ?1",
        params![whatsapp],
        |row| {
            Ok(Client {
                id: row.get(0)?,
                name: row.get(1)?,
                whatsapp: row.get(2)?,
                email: row.get(3)?,
                total_spent: row.get(4)?,
            })
        },
    );

    match result {
        Ok(client) => Ok(Some(client)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_client(conn: &Connection, client: &Client) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO clients (id, name, whatsapp, email, total_spent)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            client.id,
            client.name,
            client.whatsapp,
            client.email,
            client.total_spent,
        ],
    )?;
    Ok(())
}

pub fn update_client(conn: &Connection, client: &Client) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE clients SET name = ?2, whatsapp = ?3, email = ?4, total_spent = ?5 WHERE id = ?1",
        params![
            client.id,
            client.name,
            client.whatsapp,
            client.email,
            client.total_spent,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_client(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM clients WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Studio profile ──

pub fn get_studio(conn: &Connection) -> anyhow::Result<Option<Studio>> {
    let result = conn.query_row(
        "SELECT name, owner_name, whatsapp, address, email, history, mission
         FROM studio WHERE id = 1",
        [],
        |row| {
            Ok(Studio {
                name: row.get(0)?,
                owner_name: row.get(1)?,
                whatsapp: row.get(2)?,
                address: row.get(3)?,
                email: row.get(4)?,
                history: row.get(5)?,
                mission: row.get(6)?,
            })
        },
    );

    match result {
        Ok(studio) => Ok(Some(studio)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn save_studio(conn: &Connection, studio: &Studio) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO studio (id, name, owner_name, whatsapp, address, email, history, mission)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
           name = excluded.name,
           owner_name = excluded.owner_name,
           whatsapp = excluded.whatsapp,
           address = excluded.address,
           email = excluded.email,
           history = excluded.history,
           mission = excluded.mission",
        params![
            studio.name,
            studio.owner_name,
            studio.whatsapp,
            studio.address,
            studio.email,
            studio.history,
            studio.mission,
        ],
    )?;
    Ok(())
}

// ── Dashboard stats ──

pub struct StudioStats {
    pub completed_revenue: f64,
    pub projected_revenue: f64,
    pub completed_count: i64,
    pub upcoming_count: i64,
    pub client_count: i64,
}

/// Revenue sums parse the formatted price snapshots; SQL only sees opaque
/// strings like "R$ 130,00".
pub fn get_studio_stats(conn: &Connection) -> anyhow::Result<StudioStats> {
    let mut stmt = conn.prepare("SELECT status, price FROM appointments")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut stats = StudioStats {
        completed_revenue: 0.0,
        projected_revenue: 0.0,
        completed_count: 0,
        upcoming_count: 0,
        client_count: 0,
    };

    for row in rows {
        let (status, price) = row?;
        match AppointmentStatus::parse(&status) {
            AppointmentStatus::Completed => {
                stats.completed_count += 1;
                stats.completed_revenue += parse_price(&price);
            }
            AppointmentStatus::Upcoming => {
                stats.upcoming_count += 1;
                stats.projected_revenue += parse_price(&price);
            }
            AppointmentStatus::Cancelled => {}
        }
    }

    stats.client_count = conn.query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))?;

    Ok(stats)
}
