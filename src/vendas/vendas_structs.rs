// src/vendas/vendas_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estado de uma venda.
///
/// As transições válidas são `pendente → concluida` e `pendente → cancelada`;
/// ambos os destinos são terminais. O cancelamento devolve o estoque debitado
/// na criação; a conclusão não mexe em estoque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "status_venda", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatusVenda {
    Pendente,
    Concluida,
    Cancelada,
}

/// Cabeçalho de uma venda, como registrado no banco.
/// O total é calculado no fechamento e congelado.
#[derive(Serialize, FromRow)]
pub struct Venda {
    pub id: i32,
    pub usuario_id: i32,
    pub data: DateTime<Utc>,
    pub status: StatusVenda,
    pub total: BigDecimal,
}

/// Um item de venda resolvido com os dados de exibição do produto.
/// `preco_unitario` é o preço congelado no momento da venda, independente de
/// alterações posteriores no produto.
#[derive(Serialize, FromRow)]
pub struct ItemVendaView {
    pub produto_id: i32,
    pub nome: String,
    pub imagem_url: Option<String>,
    pub quantidade: i32,
    pub preco_unitario: BigDecimal,
    pub comentario: Option<String>,
}

/// Visão completa de uma venda: cabeçalho, dono e itens.
#[derive(Serialize)]
pub struct VendaView {
    pub id: i32,
    pub usuario_id: i32,
    pub nome_usuario: String,
    pub data: DateTime<Utc>,
    pub status: StatusVenda,
    pub total: BigDecimal,
    pub itens: Vec<ItemVendaView>,
}

/// Parâmetros de paginação da listagem de vendas.
#[derive(Deserialize)]
pub struct PaginacaoVendas {
    pub pagina: Option<i64>,
    pub limite: Option<i64>,
}
