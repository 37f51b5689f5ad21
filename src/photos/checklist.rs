//! The photo checklist: fixed items grouped into sections.
//!
//! Item ids are stable; they prefix every photo file name. Which of the two
//! machine sections applies depends on the inspection's machine room flag.

use crate::data::MachineRoom;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    GeneralSeals,
    MachineRoom,
    NoMachineRoom,
    Cabin,
    CabinTop,
    Pit,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::GeneralSeals => "General/Sellos",
            Section::MachineRoom => "Sala de máquinas",
            Section::NoMachineRoom => "Sin sala máquinas",
            Section::Cabin => "Cabina",
            Section::CabinTop => "Sobre cabina",
            Section::Pit => "Pozo",
        }
    }

    /// Sections shown for an inspection, in tab order
    pub fn for_machine_room(machine_room: MachineRoom) -> Vec<Section> {
        let mut sections = vec![Section::GeneralSeals];
        match machine_room {
            MachineRoom::Yes => sections.push(Section::MachineRoom),
            MachineRoom::No => sections.push(Section::NoMachineRoom),
            MachineRoom::Unset => {}
        }
        sections.extend([Section::Cabin, Section::CabinTop, Section::Pit]);
        sections
    }

    pub fn items(self) -> impl Iterator<Item = &'static ChecklistItem> {
        ITEMS.iter().filter(move |item| item.section == self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: u32,
    pub name: &'static str,
    pub section: Section,
    /// Sub-heading inside the section
    pub group: Option<&'static str>,
}

const fn item(id: u32, name: &'static str, section: Section) -> ChecklistItem {
    ChecklistItem {
        id,
        name,
        section,
        group: None,
    }
}

const fn grouped(id: u32, name: &'static str, group: &'static str) -> ChecklistItem {
    ChecklistItem {
        id,
        name,
        section: Section::NoMachineRoom,
        group: Some(group),
    }
}

const CONTROL_CABINET: &str = "Armario de maniobras";
const MACHINE: &str = "Máquina";

pub static ITEMS: [ChecklistItem; 46] = [
    item(101, "Fotografia general de los ascensores", Section::GeneralSeals),
    item(111, "Fotografia de sellos", Section::GeneralSeals),
    item(199, "Otros_General_y_Sellos", Section::GeneralSeals),
    item(201, "Acceso sala de maquinas", Section::MachineRoom),
    item(202, "Luz emergencia", Section::MachineRoom),
    item(203, "Luz general", Section::MachineRoom),
    item(204, "Placa de la maquina", Section::MachineRoom),
    item(205, "Placa limitador", Section::MachineRoom),
    item(206, "Material ajeno", Section::MachineRoom),
    item(207, "Marcas de piso", Section::MachineRoom),
    item(208, "Stop Cercano a la maquina", Section::MachineRoom),
    item(209, "Pasa Cables", Section::MachineRoom),
    item(210, "Proteccion en elementos moviles", Section::MachineRoom),
    item(291, "Otros_Sala_Maquinas_SI", Section::MachineRoom),
    grouped(211, "Armario maniobras", CONTROL_CABINET),
    grouped(212, "Rotulos", CONTROL_CABINET),
    grouped(213, "Placa ascensor", CONTROL_CABINET),
    grouped(214, "Conexion electrica", CONTROL_CABINET),
    grouped(215, "Maniobra rescate", CONTROL_CABINET),
    grouped(221, "Placa de maquina", MACHINE),
    grouped(222, "Placa Limitador", MACHINE),
    grouped(223, "Stop cercano a la maquina", MACHINE),
    grouped(224, "Proteccion poleas", MACHINE),
    grouped(225, "Resortes", MACHINE),
    grouped(292, "Otros_Sala_Maquinas_NO", MACHINE),
    item(301, "Plano general cabina", Section::Cabin),
    item(302, "Espejo cabina", Section::Cabin),
    item(303, "Piso cabina", Section::Cabin),
    item(304, "Datos cabina", Section::Cabin),
    item(305, "Capacidad", Section::Cabin),
    item(399, "Otros_Cabina", Section::Cabin),
    item(401, "Plano general", Section::CabinTop),
    item(402, "Conmutador", Section::CabinTop),
    item(403, "Enchufe", Section::CabinTop),
    item(404, "Iluminacion sobre cabina", Section::CabinTop),
    item(405, "Iluminacion caja", Section::CabinTop),
    item(406, "Demarcacion de ascensor", Section::CabinTop),
    item(407, "Rodapie", Section::CabinTop),
    item(408, "Medida cables", Section::CabinTop),
    item(409, "Ganchos de izaje", Section::CabinTop),
    item(499, "Otros_Sobre_Cabina", Section::CabinTop),
    item(501, "Stop", Section::Pit),
    item(502, "Enchufe", Section::Pit),
    item(503, "Reja divisora", Section::Pit),
    item(504, "Iluminacion", Section::Pit),
    item(599, "Otros_Pozo", Section::Pit),
];

pub fn find_item(id: u32) -> Option<&'static ChecklistItem> {
    ITEMS.iter().find(|item| item.id == id)
}

/// Items a complete photo set needs for the given machine room flag
pub fn expected_items(machine_room: MachineRoom) -> Vec<&'static ChecklistItem> {
    Section::for_machine_room(machine_room)
        .into_iter()
        .flat_map(Section::items)
        .collect()
}
