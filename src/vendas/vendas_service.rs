// src/vendas/vendas_service.rs

use bigdecimal::BigDecimal;
use sqlx::{query, query_as, query_scalar, FromRow, PgPool};
use tracing::info;

use super::vendas_structs::{ItemVendaView, StatusVenda, Venda, VendaView};
use crate::shared::erros::ErroLoja;

/// Uma linha do carrinho com o retrato atual do produto, lida dentro da
/// transação de fechamento.
#[derive(FromRow)]
struct LinhaFechamento {
    produto_id: i32,
    quantidade: i32,
    nome: String,
    preco: BigDecimal,
    estoque: i32,
}

const COLUNAS_VENDA: &str = "id, usuario_id, data, status, total";

/// Realiza o fechamento do carrinho do usuário, convertendo-o em uma venda.
///
/// Tudo acontece em uma única transação:
/// 1. Localiza o carrinho e carrega seus itens junto com o produto de cada
///    linha, travando as linhas de produto (`FOR UPDATE`) para evitar
///    corridas entre fechamentos concorrentes.
/// 2. Revalida o estoque de cada linha contra o valor lido dentro da
///    transação; qualquer falta aborta a operação inteira.
/// 3. Calcula o total com o preço atual de cada produto; esse preço é
///    congelado como `preco_unitario` dos itens da venda.
/// 4. Cria a venda com status 'pendente', cria os itens e decrementa o
///    estoque de cada produto.
/// 5. Esvazia o carrinho (o carrinho em si sobrevive, vazio) e comita.
///
/// Qualquer erro no meio do caminho descarta a transação: nenhuma venda,
/// nenhum item, nenhum débito de estoque e o carrinho permanece intacto.
pub async fn criar_venda(pool: &PgPool, usuario_id: i32) -> Result<VendaView, ErroLoja> {
    let mut transaction = pool.begin().await?;

    // Sem carrinho e carrinho sem itens são tratados da mesma forma: não há
    // o que fechar.
    let carrinho_id = query_scalar::<_, i32>("SELECT id FROM carrinhos WHERE usuario_id = $1")
        .bind(usuario_id)
        .fetch_optional(&mut *transaction)
        .await?
        .ok_or(ErroLoja::CarrinhoVazio)?;

    // FOR UPDATE OF p bloqueia as linhas de produto até o commit
    let linhas = query_as::<_, LinhaFechamento>(
        "SELECT ci.produto_id, ci.quantidade, p.nome, p.preco, p.estoque \
         FROM carrinho_itens ci \
         JOIN produtos p ON p.id = ci.produto_id \
         WHERE ci.carrinho_id = $1 \
         ORDER BY ci.id \
         FOR UPDATE OF p",
    )
    .bind(carrinho_id)
    .fetch_all(&mut *transaction)
    .await?;

    if linhas.is_empty() {
        return Err(ErroLoja::CarrinhoVazio);
    }

    // Revalida o estoque linha a linha antes de qualquer escrita
    for linha in &linhas {
        if linha.estoque < linha.quantidade {
            return Err(ErroLoja::EstoqueInsuficiente {
                produto: linha.nome.clone(),
                disponivel: linha.estoque,
                solicitado: linha.quantidade,
            });
        }
    }

    // Total da venda com os preços vigentes
    let mut total = BigDecimal::from(0);
    for linha in &linhas {
        let quantidade = BigDecimal::from(linha.quantidade);
        total += &linha.preco * &quantidade;
    }

    // Cria o cabeçalho da venda (status 'pendente', data now())
    let venda_id = query_scalar::<_, i32>(
        "INSERT INTO vendas (usuario_id, total) VALUES ($1, $2) RETURNING id",
    )
    .bind(usuario_id)
    .bind(&total)
    .fetch_one(&mut *transaction)
    .await?;

    // Itens da venda com preço congelado + débito de estoque
    for linha in &linhas {
        query(
            "INSERT INTO venda_itens (venda_id, produto_id, quantidade, preco_unitario) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(venda_id)
        .bind(linha.produto_id)
        .bind(linha.quantidade)
        .bind(&linha.preco)
        .execute(&mut *transaction)
        .await?;

        query("UPDATE produtos SET estoque = estoque - $1 WHERE id = $2")
            .bind(linha.quantidade)
            .bind(linha.produto_id)
            .execute(&mut *transaction)
            .await?;
    }

    // Esvazia o carrinho; a linha do carrinho em si permanece
    query("DELETE FROM carrinho_itens WHERE carrinho_id = $1")
        .bind(carrinho_id)
        .execute(&mut *transaction)
        .await?;

    transaction.commit().await?;

    info!(venda_id, usuario_id, "venda fechada");

    // Relê a venda já comitada para devolver a visão completa
    montar_venda(pool, venda_id).await
}

/// Cancela uma venda pendente, devolvendo integralmente o estoque debitado.
///
/// Somente o dono da venda ou um administrador pode cancelar, e somente
/// vendas pendentes são canceláveis. A restituição de estoque e a mudança de
/// status acontecem na mesma transação; restituição parcial nunca fica
/// visível.
pub async fn cancelar_venda(
    pool: &PgPool,
    venda_id: i32,
    solicitante_id: i32,
    eh_admin: bool,
) -> Result<VendaView, ErroLoja> {
    let mut transaction = pool.begin().await?;

    let sql = format!("SELECT {} FROM vendas WHERE id = $1 FOR UPDATE", COLUNAS_VENDA);
    let venda = query_as::<_, Venda>(&sql)
        .bind(venda_id)
        .fetch_optional(&mut *transaction)
        .await?
        .ok_or(ErroLoja::VendaNaoEncontrada)?;

    if !eh_admin && venda.usuario_id != solicitante_id {
        return Err(ErroLoja::NaoAutorizado);
    }

    if venda.status != StatusVenda::Pendente {
        return Err(ErroLoja::EstadoInvalido);
    }

    // Restituição: devolve a quantidade de cada item ao estoque do produto
    let itens = query_as::<_, (i32, i32)>(
        "SELECT produto_id, quantidade FROM venda_itens WHERE venda_id = $1",
    )
    .bind(venda_id)
    .fetch_all(&mut *transaction)
    .await?;

    for (produto_id, quantidade) in itens {
        query("UPDATE produtos SET estoque = estoque + $1 WHERE id = $2")
            .bind(quantidade)
            .bind(produto_id)
            .execute(&mut *transaction)
            .await?;
    }

    query("UPDATE vendas SET status = 'cancelada' WHERE id = $1")
        .bind(venda_id)
        .execute(&mut *transaction)
        .await?;

    transaction.commit().await?;

    info!(venda_id, solicitante_id, "venda cancelada com restituição de estoque");

    montar_venda(pool, venda_id).await
}

/// Marca uma venda pendente como concluída. Não há efeito sobre estoque ou
/// itens: o débito já aconteceu na criação.
pub async fn concluir_venda(pool: &PgPool, venda_id: i32) -> Result<VendaView, ErroLoja> {
    let mut transaction = pool.begin().await?;

    let status = query_scalar::<_, StatusVenda>("SELECT status FROM vendas WHERE id = $1 FOR UPDATE")
        .bind(venda_id)
        .fetch_optional(&mut *transaction)
        .await?
        .ok_or(ErroLoja::VendaNaoEncontrada)?;

    if status != StatusVenda::Pendente {
        return Err(ErroLoja::EstadoInvalido);
    }

    query("UPDATE vendas SET status = 'concluida' WHERE id = $1")
        .bind(venda_id)
        .execute(&mut *transaction)
        .await?;

    transaction.commit().await?;

    montar_venda(pool, venda_id).await
}

/// Busca uma venda com dono e itens, aplicando a mesma regra de autorização
/// do cancelamento: apenas o dono ou um administrador enxerga os detalhes.
pub async fn buscar_venda(
    pool: &PgPool,
    venda_id: i32,
    solicitante_id: i32,
    eh_admin: bool,
) -> Result<VendaView, ErroLoja> {
    let venda = montar_venda(pool, venda_id).await?;
    if !eh_admin && venda.usuario_id != solicitante_id {
        return Err(ErroLoja::NaoAutorizado);
    }
    Ok(venda)
}

/// Lista vendas paginadas em ordem estável: mais recentes primeiro, empates
/// resolvidos pelo id ascendente.
pub async fn listar_vendas(
    pool: &PgPool,
    pagina: Option<i64>,
    limite: Option<i64>,
) -> Result<Vec<Venda>, ErroLoja> {
    let (pagina, limite) = normalizar_paginacao(pagina, limite);
    let offset = (pagina - 1) * limite;

    let sql = format!(
        "SELECT {} FROM vendas ORDER BY data DESC, id ASC LIMIT $1 OFFSET $2",
        COLUNAS_VENDA
    );
    let vendas = query_as::<_, Venda>(&sql)
        .bind(limite)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(vendas)
}

/// Lista as vendas de um usuário, da mais recente para a mais antiga.
pub async fn vendas_do_usuario(pool: &PgPool, usuario_id: i32) -> Result<Vec<Venda>, ErroLoja> {
    let sql = format!(
        "SELECT {} FROM vendas WHERE usuario_id = $1 ORDER BY data DESC, id ASC",
        COLUNAS_VENDA
    );
    let vendas = query_as::<_, Venda>(&sql)
        .bind(usuario_id)
        .fetch_all(pool)
        .await?;

    Ok(vendas)
}

/// Monta a visão completa de uma venda: cabeçalho com o nome do dono e os
/// itens resolvidos com nome e imagem do produto.
async fn montar_venda(pool: &PgPool, venda_id: i32) -> Result<VendaView, ErroLoja> {
    #[derive(FromRow)]
    struct VendaComDono {
        id: i32,
        usuario_id: i32,
        nome_usuario: String,
        data: chrono::DateTime<chrono::Utc>,
        status: StatusVenda,
        total: BigDecimal,
    }

    let cabecalho = query_as::<_, VendaComDono>(
        "SELECT v.id, v.usuario_id, u.nome AS nome_usuario, v.data, v.status, v.total \
         FROM vendas v \
         JOIN usuarios u ON u.id = v.usuario_id \
         WHERE v.id = $1",
    )
    .bind(venda_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ErroLoja::VendaNaoEncontrada)?;

    let itens = query_as::<_, ItemVendaView>(
        "SELECT vi.produto_id, p.nome, p.imagem_url, vi.quantidade, vi.preco_unitario, vi.comentario \
         FROM venda_itens vi \
         JOIN produtos p ON p.id = vi.produto_id \
         WHERE vi.venda_id = $1 \
         ORDER BY vi.id",
    )
    .bind(venda_id)
    .fetch_all(pool)
    .await?;

    Ok(VendaView {
        id: cabecalho.id,
        usuario_id: cabecalho.usuario_id,
        nome_usuario: cabecalho.nome_usuario,
        data: cabecalho.data,
        status: cabecalho.status,
        total: cabecalho.total,
        itens,
    })
}

/// Normaliza os parâmetros de paginação: página mínima 1, limite entre 1 e
/// 100, padrão de 10 itens por página.
fn normalizar_paginacao(pagina: Option<i64>, limite: Option<i64>) -> (i64, i64) {
    let pagina = pagina.unwrap_or(1).max(1);
    let limite = limite.unwrap_or(10).clamp(1, 100);
    (pagina, limite)
}

#[cfg(test)]
mod tests {
    use super::normalizar_paginacao;

    #[test]
    fn paginacao_usa_padroes_quando_ausente() {
        assert_eq!(normalizar_paginacao(None, None), (1, 10));
    }

    #[test]
    fn paginacao_corrige_valores_fora_do_intervalo() {
        assert_eq!(normalizar_paginacao(Some(0), Some(0)), (1, 1));
        assert_eq!(normalizar_paginacao(Some(-3), Some(1000)), (1, 100));
        assert_eq!(normalizar_paginacao(Some(5), Some(25)), (5, 25));
    }
}
